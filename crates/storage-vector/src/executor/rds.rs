use async_trait::async_trait;
use aws_sdk_rdsdata::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_rdsdata::primitives::Blob;
use aws_sdk_rdsdata::types::{
    ArrayValue, Field, RecordsFormatType, SqlParameter, TypeHint as SdkTypeHint,
};
use aws_sdk_rdsdata::Client;
use ingestion_parameters::{EncodedValue, ParameterDescriptor, TypeHint};
use tracing::{debug, instrument};

use super::{RecordsFormat, StatementExecutor, StatementOutcome, StatementRequest};
use crate::error::ExecutorError;
use crate::schema::vector_literal;

/// Error codes the Data API returns when a statement should be retried later.
const RETRYABLE_CODES: &[&str] = &[
    "ThrottlingException",
    "TooManyRequestsException",
    "ServiceUnavailableError",
    "DatabaseResumingException",
];

/// Cluster, credentials secret and database addressed by every statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataApiTarget {
    pub resource_arn: String,
    pub secret_arn: String,
    pub database: String,
}

impl DataApiTarget {
    pub fn new(
        resource_arn: impl Into<String>,
        secret_arn: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            resource_arn: resource_arn.into(),
            secret_arn: secret_arn.into(),
            database: database.into(),
        }
    }
}

/// How double arrays are bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArrayBinding {
    /// `arrayValue.doubleValues`.
    Native,
    /// pgvector text literal `[a,b,c]` in a `stringValue`; the statement
    /// casts it with `::vector`. `ExecuteStatement` rejects array parameters.
    #[default]
    Literal,
}

fn to_field(descriptor: &ParameterDescriptor, binding: ArrayBinding) -> Field {
    match &descriptor.value {
        EncodedValue::Null => Field::IsNull(true),
        EncodedValue::Boolean(value) => Field::BooleanValue(*value),
        EncodedValue::Long(value) => Field::LongValue(*value),
        EncodedValue::Double(value) => Field::DoubleValue(*value),
        EncodedValue::String(value) => Field::StringValue(value.clone()),
        EncodedValue::Blob(bytes) => Field::BlobValue(Blob::new(bytes.clone())),
        EncodedValue::DoubleArray(values) => match binding {
            ArrayBinding::Native => Field::ArrayValue(ArrayValue::DoubleValues(values.clone())),
            ArrayBinding::Literal => Field::StringValue(vector_literal(values)),
        },
    }
}

const fn to_type_hint(hint: TypeHint) -> SdkTypeHint {
    match hint {
        TypeHint::Timestamp => SdkTypeHint::Timestamp,
        TypeHint::Date => SdkTypeHint::Date,
        TypeHint::Time => SdkTypeHint::Time,
        TypeHint::Decimal => SdkTypeHint::Decimal,
    }
}

/// Convert encoded descriptors into SDK parameters, preserving order.
pub fn to_sql_parameters(
    parameters: &[ParameterDescriptor],
    binding: ArrayBinding,
) -> Vec<SqlParameter> {
    parameters
        .iter()
        .map(|descriptor| {
            SqlParameter::builder()
                .name(&descriptor.name)
                .value(to_field(descriptor, binding))
                .set_type_hint(descriptor.type_hint.map(to_type_hint))
                .build()
        })
        .collect()
}

/// [`StatementExecutor`] over the RDS Data API `ExecuteStatement` call.
#[derive(Debug, Clone)]
pub struct RdsDataExecutor {
    client: Client,
    target: DataApiTarget,
    array_binding: ArrayBinding,
}

impl RdsDataExecutor {
    #[must_use]
    pub fn new(client: Client, target: DataApiTarget) -> Self {
        Self {
            client,
            target,
            array_binding: ArrayBinding::default(),
        }
    }

    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig, target: DataApiTarget) -> Self {
        Self::new(Client::new(sdk_config), target)
    }

    #[must_use]
    pub const fn with_array_binding(mut self, binding: ArrayBinding) -> Self {
        self.array_binding = binding;
        self
    }

    #[must_use]
    pub const fn target(&self) -> &DataApiTarget {
        &self.target
    }
}

#[async_trait]
impl StatementExecutor for RdsDataExecutor {
    #[instrument(skip_all, fields(database = %self.target.database, parameters = request.parameters.len()))]
    async fn execute(&self, request: StatementRequest) -> Result<StatementOutcome, ExecutorError> {
        let parameters = to_sql_parameters(&request.parameters, self.array_binding);
        let mut call = self
            .client
            .execute_statement()
            .resource_arn(&self.target.resource_arn)
            .secret_arn(&self.target.secret_arn)
            .database(&self.target.database)
            .sql(&request.sql);
        if !parameters.is_empty() {
            call = call.set_parameters(Some(parameters));
        }
        if request.records_format == RecordsFormat::Json {
            call = call.format_records_as(RecordsFormatType::Json);
        }
        let output = call.send().await.map_err(|err| {
            let detail = DisplayErrorContext(&err).to_string();
            match err.code() {
                Some(code) if RETRYABLE_CODES.contains(&code) => ExecutorError::Throttled(detail),
                _ => ExecutorError::Remote(detail),
            }
        })?;
        debug!(
            records_updated = output.number_of_records_updated(),
            "statement executed"
        );
        Ok(StatementOutcome {
            records_updated: output.number_of_records_updated(),
            formatted_records: output.formatted_records().map(str::to_string),
        })
    }
}
