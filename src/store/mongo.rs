use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::{Client, Collection, Database};

use super::CoffeeStore;
use crate::decimal::{from_decimal128, to_decimal128};
use crate::error::{StoreError, StoreResult};
use crate::model::{CoffeeFields, CoffeeRecord};

/// MongoDB-backed store. One document per coffee in a single collection.
///
/// The driver's `Client` pools connections internally, so one `MongoStore`
/// is shared by every request.
pub struct MongoStore {
    database: Database,
    collection: Collection<Document>,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str, collection: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let database = client.database(database);
        let collection = database.collection::<Document>(collection);
        tracing::info!(
            database = %database.name(),
            collection = %collection.name(),
            "connected to mongodb"
        );
        Ok(Self {
            database,
            collection,
        })
    }
}

fn fields_document(fields: &CoffeeFields) -> Document {
    let mut document = doc! {
        "name": fields.name.as_str(),
        "company": fields.company.as_str(),
        "tags": fields.tags.as_str(),
    };
    if let Some(price) = fields.price {
        document.insert("price", Bson::Decimal128(to_decimal128(price)));
    }
    document
}

fn record_from_document(document: &Document) -> StoreResult<CoffeeRecord> {
    let text = |key: &str| {
        document
            .get_str(key)
            .map(str::to_string)
            .map_err(|e| StoreError::malformed(format!("{key}: {e}")))
    };

    let id = document
        .get_object_id("_id")
        .map_err(|e| StoreError::malformed(format!("_id: {e}")))?;

    let price = match document.get("price") {
        None | Some(Bson::Null) => None,
        Some(Bson::Decimal128(value)) => Some(from_decimal128(value).ok_or_else(|| {
            StoreError::malformed(format!("price of {id} is not a finite decimal"))
        })?),
        Some(other) => {
            return Err(StoreError::malformed(format!(
                "price of {id} has unexpected type {:?}",
                other.element_type()
            )))
        }
    };

    let image_url = match document.get("imageUrl") {
        Some(Bson::String(url)) => Some(url.clone()),
        _ => None,
    };

    Ok(CoffeeRecord {
        id,
        name: text("name")?,
        company: text("company")?,
        tags: text("tags")?,
        price,
        image_url,
    })
}

#[async_trait]
impl CoffeeStore for MongoStore {
    async fn insert(&self, fields: &CoffeeFields) -> StoreResult<ObjectId> {
        let result = self
            .collection
            .insert_one(fields_document(fields), None)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::malformed("inserted _id is not an ObjectId"))
    }

    async fn find_all(&self) -> StoreResult<Vec<CoffeeRecord>> {
        let mut cursor = self
            .collection
            .find(None, None)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        let mut records = Vec::new();
        while let Some(document) = cursor
            .try_next()
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?
        {
            records.push(record_from_document(&document)?);
        }
        Ok(records)
    }

    async fn find(&self, id: &ObjectId) -> StoreResult<Option<CoffeeRecord>> {
        let document = self
            .collection
            .find_one(doc! { "_id": *id }, None)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        document.as_ref().map(record_from_document).transpose()
    }

    async fn update(&self, id: &ObjectId, fields: &CoffeeFields) -> StoreResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": *id },
                doc! { "$set": fields_document(fields) },
                None,
            )
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(result.matched_count > 0)
    }

    async fn set_image_url(&self, id: &ObjectId, url: &str) -> StoreResult<bool> {
        let result = self
            .collection
            .update_one(doc! { "_id": *id }, doc! { "$set": { "imageUrl": url } }, None)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &ObjectId) -> StoreResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": *id }, None)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn price_is_stored_as_decimal128() {
        let fields = CoffeeFields {
            name: "Gesha".into(),
            company: "Hacienda".into(),
            tags: "jasmine".into(),
            price: Some(Decimal::from_str("24.90").unwrap()),
        };
        let document = fields_document(&fields);
        assert!(matches!(document.get("price"), Some(Bson::Decimal128(_))));
        assert_eq!(document.keys().collect::<Vec<_>>(), ["name", "company", "tags", "price"]);
    }

    #[test]
    fn absent_price_is_not_written() {
        let fields = CoffeeFields {
            name: "Gesha".into(),
            company: "Hacienda".into(),
            tags: "".into(),
            price: None,
        };
        assert!(!fields_document(&fields).contains_key("price"));
    }

    #[test]
    fn documents_decode_into_records() {
        let id = ObjectId::new();
        let document = doc! {
            "_id": id,
            "name": "Gesha",
            "company": "Hacienda",
            "tags": "jasmine",
            "price": Bson::Decimal128(to_decimal128(Decimal::from_str("24.90").unwrap())),
            "imageUrl": "http://img/x",
        };
        let record = record_from_document(&document).unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.price.unwrap().to_string(), "24.90");
        assert_eq!(record.image_url.as_deref(), Some("http://img/x"));
    }

    #[test]
    fn missing_required_key_is_malformed() {
        let document = doc! { "_id": ObjectId::new(), "name": "Gesha" };
        assert!(matches!(
            record_from_document(&document),
            Err(StoreError::Malformed(_))
        ));
    }
}
