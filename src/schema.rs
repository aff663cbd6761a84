//! The one table this crate owns, and its SQL for each dialect.

/// SQL flavour a statement is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    Integer,
    /// Bounded text; SQLite ignores the bound.
    Varchar(u16),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraint {
    PrimaryKey,
    AutoIncrement,
    NotNull,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: &'static str,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    fn render(&self, dialect: Dialect) -> String {
        let has = |c: ColumnConstraint| self.constraints.contains(&c);
        let mut sql = format!("{} ", self.name);
        match (dialect, &self.data_type) {
            (Dialect::MySql, DataType::Integer) => sql.push_str("INT"),
            (Dialect::MySql, DataType::Varchar(len)) => sql.push_str(&format!("VARCHAR({len})")),
            (Dialect::Sqlite, DataType::Integer) => sql.push_str("INTEGER"),
            (Dialect::Sqlite, DataType::Varchar(_)) => sql.push_str("TEXT"),
        }
        if has(ColumnConstraint::NotNull) {
            sql.push_str(" NOT NULL");
        }
        match dialect {
            Dialect::MySql => {
                if has(ColumnConstraint::AutoIncrement) {
                    sql.push_str(" AUTO_INCREMENT");
                }
                if has(ColumnConstraint::PrimaryKey) {
                    sql.push_str(" PRIMARY KEY");
                }
            }
            // SQLite only accepts AUTOINCREMENT after PRIMARY KEY.
            Dialect::Sqlite => {
                if has(ColumnConstraint::PrimaryKey) {
                    sql.push_str(" PRIMARY KEY");
                }
                if has(ColumnConstraint::AutoIncrement) {
                    sql.push_str(" AUTOINCREMENT");
                }
            }
        }
        sql
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: &'static str,
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name)
    }

    pub fn create_sql(&self, dialect: Dialect) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| c.render(dialect)).collect();
        format!("CREATE TABLE {} ({})", self.name, columns.join(", "))
    }
}

pub const CONSULTANTS_TABLE: &str = "tech_consultants";

/// `id` is assigned by the engine; callers only ever bind name and specialty.
pub const INSERT_CONSULTANT: &str = "INSERT INTO tech_consultants (name, specialty) VALUES (?, ?)";

pub const SELECT_CONSULTANTS: &str = "SELECT id, name, specialty FROM tech_consultants ORDER BY id";

pub fn consultants_table() -> TableDefinition {
    TableDefinition {
        name: CONSULTANTS_TABLE,
        columns: vec![
            ColumnDefinition {
                name: "id",
                data_type: DataType::Integer,
                constraints: vec![ColumnConstraint::PrimaryKey, ColumnConstraint::AutoIncrement],
            },
            ColumnDefinition {
                name: "name",
                data_type: DataType::Varchar(255),
                constraints: vec![ColumnConstraint::NotNull],
            },
            ColumnDefinition {
                name: "specialty",
                data_type: DataType::Varchar(255),
                constraints: vec![],
            },
        ],
    }
}
