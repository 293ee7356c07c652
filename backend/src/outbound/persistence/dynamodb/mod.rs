//! DynamoDB-backed [`DocumentStore`].
//!
//! Each [`DynamoStore`] wraps one table with a string partition key. Exact
//! match lookups go through global secondary indexes registered with
//! [`DynamoTable::with_index`]; the indexes must project all attributes.
//! Every write carries an `attribute_exists`/`attribute_not_exists`
//! condition on the partition key so missing and duplicate records surface
//! as [`StoreError::ConditionFailed`].

mod attribute_value;

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use serde_json::Value;
use tracing::debug;

use self::attribute_value::{from_attribute, from_item, to_attribute, to_item};
use super::document_store::{Document, DocumentStore, DocumentUpdate, StoreError, resume_key};
use crate::domain::{ContinuationKey, Page};

const CONDITIONAL_CHECK_FAILED: &str = "ConditionalCheckFailedException";

/// Table layout for one [`DynamoStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoTable {
    name: String,
    key_attribute: String,
    indexes: HashMap<String, String>,
}

impl DynamoTable {
    /// Table `name` partitioned on `key_attribute`.
    pub fn new(name: impl Into<String>, key_attribute: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_attribute: key_attribute.into(),
            indexes: HashMap::new(),
        }
    }

    /// Register the global secondary index partitioned on `attribute`.
    #[must_use]
    pub fn with_index(mut self, attribute: impl Into<String>, index: impl Into<String>) -> Self {
        self.indexes.insert(attribute.into(), index.into());
        self
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Document store over one DynamoDB table.
#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
    table: DynamoTable,
}

impl DynamoStore {
    /// Wrap `client` for the given table.
    pub fn new(client: Client, table: DynamoTable) -> Self {
        Self { client, table }
    }

    fn key(&self, key: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([(
            self.table.key_attribute.clone(),
            AttributeValue::S(key.to_owned()),
        )])
    }
}

/// Map SDK failures onto store errors.
///
/// Timeouts and dispatch failures mean the service was not reached; a
/// failed write condition is reported separately so callers can tell
/// "absent" or "already exists" apart from genuine failures.
fn map_sdk_error<E, R>(operation: &'static str, error: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = format!("{operation}: {}", DisplayErrorContext(&error));
    debug!(operation, code = error.code(), "dynamodb request failed");
    match &error {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            StoreError::connection(message)
        }
        _ if error.code() == Some(CONDITIONAL_CHECK_FAILED) => StoreError::ConditionFailed,
        _ => StoreError::request(message),
    }
}

/// `ExclusiveStartKey` for a scan resuming after `after`.
fn exclusive_start_key(
    table: &DynamoTable,
    after: Option<&ContinuationKey>,
) -> Result<Option<HashMap<String, AttributeValue>>, StoreError> {
    after
        .map(|key| {
            resume_key(key, &table.key_attribute).map(|value| {
                HashMap::from([(
                    table.key_attribute.clone(),
                    AttributeValue::S(value.to_owned()),
                )])
            })
        })
        .transpose()
}

fn continuation_from(
    key: Option<&HashMap<String, AttributeValue>>,
) -> Result<Option<ContinuationKey>, StoreError> {
    key.map(|item| from_item(item).map(ContinuationKey::new))
        .transpose()
}

/// Build `SET #s0 = :s0, ...` plus an optional list concatenation clause.
fn update_expression(
    update: &DocumentUpdate,
) -> (
    String,
    HashMap<String, String>,
    HashMap<String, AttributeValue>,
) {
    let mut clauses = Vec::new();
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    for (index, (name, value)) in update.assignments().iter().enumerate() {
        names.insert(format!("#s{index}"), name.clone());
        values.insert(format!(":s{index}"), to_attribute(value));
        clauses.push(format!("#s{index} = :s{index}"));
    }
    if let Some((name, items)) = update.concatenation() {
        names.insert("#list".to_owned(), name.to_owned());
        values.insert(
            ":items".to_owned(),
            AttributeValue::L(items.iter().map(to_attribute).collect()),
        );
        values.insert(":empty".to_owned(), AttributeValue::L(Vec::new()));
        clauses.push("#list = list_append(if_not_exists(#list, :empty), :items)".to_owned());
    }

    (format!("SET {}", clauses.join(", ")), names, values)
}

#[async_trait]
impl DocumentStore for DynamoStore {
    fn key_attribute(&self) -> &str {
        &self.table.key_attribute
    }

    async fn put_new(&self, document: Document) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table.name)
            .set_item(Some(to_item(&document)))
            .condition_expression("attribute_not_exists(#pk)")
            .expression_attribute_names("#pk", &self.table.key_attribute)
            .send()
            .await
            .map_err(|err| map_sdk_error("PutItem", err))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Document>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table.name)
            .set_key(Some(self.key(key)))
            .send()
            .await
            .map_err(|err| map_sdk_error("GetItem", err))?;
        output.item().map(from_item).transpose()
    }

    async fn query_index(
        &self,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let index = self.table.indexes.get(attribute).ok_or_else(|| {
            StoreError::request(format!(
                "no index registered for attribute '{attribute}' on table {}",
                self.table.name
            ))
        })?;

        let mut documents = Vec::new();
        let mut start_key = None;
        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table.name)
                .index_name(index)
                .key_condition_expression("#attr = :value")
                .expression_attribute_names("#attr", attribute)
                .expression_attribute_values(":value", AttributeValue::S(value.to_owned()))
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|err| map_sdk_error("Query", err))?;
            for item in output.items() {
                documents.push(from_item(item)?);
            }
            match output.last_evaluated_key() {
                Some(key) => start_key = Some(key.clone()),
                None => break,
            }
        }
        Ok(documents)
    }

    /// DynamoDB reports `LastEvaluatedKey` whenever `Limit` items were read,
    /// so a page ending exactly at the end of the table still carries a
    /// continuation key and the following page is empty.
    async fn scan(
        &self,
        limit: usize,
        after: Option<&ContinuationKey>,
    ) -> Result<Page<Document>, StoreError> {
        let limit = i32::try_from(limit)
            .map_err(|_| StoreError::request(format!("scan limit {limit} is too large")))?;
        let start_key = exclusive_start_key(&self.table, after)?;
        let output = self
            .client
            .scan()
            .table_name(&self.table.name)
            .limit(limit)
            .set_exclusive_start_key(start_key)
            .send()
            .await
            .map_err(|err| map_sdk_error("Scan", err))?;
        let items = output
            .items()
            .iter()
            .map(from_item)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            next: continuation_from(output.last_evaluated_key())?,
        })
    }

    async fn update(&self, key: &str, update: DocumentUpdate) -> Result<Document, StoreError> {
        let (expression, mut names, values) = update_expression(&update);
        names.insert("#pk".to_owned(), self.table.key_attribute.clone());
        let output = self
            .client
            .update_item()
            .table_name(&self.table.name)
            .set_key(Some(self.key(key)))
            .update_expression(expression)
            .condition_expression("attribute_exists(#pk)")
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|err| map_sdk_error("UpdateItem", err))?;
        output
            .attributes()
            .map(from_item)
            .transpose()?
            .ok_or_else(|| StoreError::malformed("UpdateItem returned no attributes"))
    }

    async fn increment(&self, key: &str, counter: &str) -> Result<u64, StoreError> {
        let output = self
            .client
            .update_item()
            .table_name(&self.table.name)
            .set_key(Some(self.key(key)))
            .update_expression("SET #counter = if_not_exists(#counter, :zero) + :one")
            .condition_expression("attribute_exists(#pk)")
            .expression_attribute_names("#pk", &self.table.key_attribute)
            .expression_attribute_names("#counter", counter)
            .expression_attribute_values(":zero", AttributeValue::N("0".to_owned()))
            .expression_attribute_values(":one", AttributeValue::N("1".to_owned()))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await
            .map_err(|err| map_sdk_error("UpdateItem", err))?;
        let value = output
            .attributes()
            .and_then(|attrs| attrs.get(counter))
            .map(from_attribute)
            .transpose()?;
        value
            .as_ref()
            .and_then(Value::as_u64)
            .ok_or_else(|| StoreError::malformed(format!("counter '{counter}' missing from response")))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table.name)
            .set_key(Some(self.key(key)))
            .condition_expression("attribute_exists(#pk)")
            .expression_attribute_names("#pk", &self.table.key_attribute)
            .send()
            .await
            .map_err(|err| map_sdk_error("DeleteItem", err))?;
        Ok(())
    }
}
