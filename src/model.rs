use std::fmt;

/// A stored row of `tech_consultants`. `id` always comes from the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consultant {
    pub id: i64,
    pub name: String,
    pub specialty: Option<String>,
}

impl fmt::Display for Consultant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {}, Name: {}, Specialty: ", self.id, self.name)?;
        match &self.specialty {
            Some(specialty) => f.write_str(specialty),
            None => f.write_str("None"),
        }
    }
}

/// Insert payload; the caller never supplies an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConsultant {
    pub name: String,
    pub specialty: Option<String>,
}

impl NewConsultant {
    pub fn new(name: impl Into<String>, specialty: Option<&str>) -> Self {
        Self {
            name: name.into(),
            specialty: specialty.map(str::to_string),
        }
    }
}

/// Result of a committed insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inserted {
    pub id: i64,
    pub rows_affected: u64,
}

const SAMPLES: [(&str, &str); 3] = [
    ("Carol Danvers", "Python & RDS Free Tier"),
    ("Peter Parker", "Data Analysis"),
    ("Tony Stark", "Advanced Engineering"),
];

/// The fixed rows every run inserts, in insertion order.
pub fn sample_consultants() -> Vec<NewConsultant> {
    SAMPLES
        .iter()
        .map(|(name, specialty)| NewConsultant::new(*name, Some(*specialty)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_listing_format() {
        let row = Consultant {
            id: 7,
            name: "Peter Parker".into(),
            specialty: Some("Data Analysis".into()),
        };
        assert_eq!(row.to_string(), "ID: 7, Name: Peter Parker, Specialty: Data Analysis");

        let bare = Consultant {
            id: 8,
            name: "Nobody".into(),
            specialty: None,
        };
        assert_eq!(bare.to_string(), "ID: 8, Name: Nobody, Specialty: None");
    }

    #[test]
    fn samples_keep_insertion_order() {
        let names: Vec<_> = sample_consultants().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Carol Danvers", "Peter Parker", "Tony Stark"]);
    }
}
