use bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::error::ValidationError;
use crate::validate::{parse_price, required};

/// The writable fields of a coffee, as supplied by a create or update request.
///
/// `price: None` means "not supplied": an update leaves any stored price in
/// place rather than clearing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoffeeFields {
    pub name: String,
    pub company: String,
    pub tags: String,
    pub price: Option<Decimal>,
}

impl CoffeeFields {
    /// Validate raw form values.
    ///
    /// Required fields are checked in `name`, `company`, `tags` order before
    /// the price, so a request missing both reports the missing field.
    pub fn from_form(
        name: Option<&str>,
        company: Option<&str>,
        tags: Option<&str>,
        price: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let name = required("name", name)?;
        let company = required("company", company)?;
        let tags = required("tags", tags)?;
        let price = match price {
            Some(raw) => parse_price(raw.trim())?,
            None => None,
        };

        Ok(Self {
            name: name.to_string(),
            company: company.to_string(),
            tags: tags.to_string(),
            price,
        })
    }
}

/// A stored coffee, rendered on the wire as
/// `{id, name, company, tags, price?, imageUrl?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoffeeRecord {
    #[serde(serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    pub name: String,
    pub company: String,
    pub tags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CoffeeRecord {
    pub fn new(id: ObjectId, fields: CoffeeFields) -> Self {
        Self {
            id,
            name: fields.name,
            company: fields.company,
            tags: fields.tags,
            price: fields.price,
            image_url: None,
        }
    }

    /// Overwrite the supplied fields; an absent price keeps the stored one.
    pub fn apply(&mut self, fields: &CoffeeFields) {
        self.name.clone_from(&fields.name);
        self.company.clone_from(&fields.company);
        self.tags.clone_from(&fields.tags);
        if let Some(price) = fields.price {
            self.price = Some(price);
        }
    }
}

fn serialize_object_id<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&id.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn fields(price: Option<&str>) -> CoffeeFields {
        CoffeeFields::from_form(Some("Yirgacheffe"), Some("Onyx"), Some("floral,citrus"), price)
            .unwrap()
    }

    #[test]
    fn missing_fields_are_reported_in_order() {
        let err = CoffeeFields::from_form(None, None, Some("t"), Some("bad")).unwrap_err();
        assert_eq!(err, ValidationError::MissingParameter("name"));

        let err = CoffeeFields::from_form(Some("n"), Some("c"), None, None).unwrap_err();
        assert_eq!(err, ValidationError::MissingParameter("tags"));
    }

    #[test]
    fn price_is_trimmed_before_validation() {
        let f = fields(Some("  9.50 "));
        assert_eq!(f.price, Some(Decimal::from_str("9.50").unwrap()));
    }

    #[test]
    fn empty_price_is_not_stored() {
        assert_eq!(fields(Some("")).price, None);
        assert_eq!(fields(None).price, None);
    }

    #[test]
    fn serializes_with_wire_names_and_order() {
        let id = ObjectId::parse_str("64b7f0c2a1b2c3d4e5f6a7b8").unwrap();
        let mut record = CoffeeRecord::new(id, fields(Some("12.34")));
        record.image_url = Some("http://img/64b7f0c2a1b2c3d4e5f6a7b8".into());

        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(
            text,
            r#"{"id":"64b7f0c2a1b2c3d4e5f6a7b8","name":"Yirgacheffe","company":"Onyx","tags":"floral,citrus","price":"12.34","imageUrl":"http://img/64b7f0c2a1b2c3d4e5f6a7b8"}"#
        );
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let record = CoffeeRecord::new(ObjectId::new(), fields(None));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value.get("price"), None);
        assert_eq!(value.get("imageUrl"), None);
        assert_eq!(value["tags"], json!("floral,citrus"));
    }

    #[test]
    fn apply_keeps_price_when_not_supplied() {
        let mut record = CoffeeRecord::new(ObjectId::new(), fields(Some("4.20")));
        record.apply(&CoffeeFields {
            name: "Renamed".into(),
            company: "Onyx".into(),
            tags: "".into(),
            price: None,
        });
        assert_eq!(record.name, "Renamed");
        assert_eq!(record.price, Some(Decimal::from_str("4.20").unwrap()));
    }
}
