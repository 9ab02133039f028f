//! Lead records

use serde::{Deserialize, Serialize};

/// The eight text fields a record carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Phone,
    Website,
    Rating,
    ReviewCount,
    Category,
    Address,
    LinkId,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Phone,
        Field::Website,
        Field::Rating,
        Field::ReviewCount,
        Field::Category,
        Field::Address,
        Field::LinkId,
    ];
}

/// One business entry. Numeric-looking fields stay text.
///
/// JSON keys match the CSV header names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Website")]
    pub website: String,
    #[serde(rename = "Rating")]
    pub rating: String,
    #[serde(rename = "Reviews")]
    pub review_count: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "System_Link_ID")]
    pub link_id: String,
}

impl Record {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Website => &self.website,
            Field::Rating => &self.rating,
            Field::ReviewCount => &self.review_count,
            Field::Category => &self.category,
            Field::Address => &self.address,
            Field::LinkId => &self.link_id,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Phone => &mut self.phone,
            Field::Website => &mut self.website,
            Field::Rating => &mut self.rating,
            Field::ReviewCount => &mut self.review_count,
            Field::Category => &mut self.category,
            Field::Address => &mut self.address,
            Field::LinkId => &mut self.link_id,
        };
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_each_field() {
        let mut record = Record::default();
        for (i, field) in Field::ALL.iter().enumerate() {
            record.set(*field, format!("v{i}"));
        }
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(record.get(*field), format!("v{i}"));
        }
    }

    #[test]
    fn json_uses_header_names() {
        let record = Record {
            name: "Acme".into(),
            review_count: "10".into(),
            link_id: "ID1".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Name"], "Acme");
        assert_eq!(json["Reviews"], "10");
        assert_eq!(json["System_Link_ID"], "ID1");
    }
}
