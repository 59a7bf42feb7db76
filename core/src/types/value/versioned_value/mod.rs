use redb::TypeName;
use thiserror::Error;
pub use v1 as latest_value;

pub mod v1;

pub trait ValueVariant {
    const VERSION: u8;
}

/// On-disk campaign record, tagged with a one-byte format version.
#[derive(Debug, Clone)]
pub enum VersionedValue {
    V1(v1::Value),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("empty campaign record")]
    Empty,
    #[error("unsupported campaign record version: {0}")]
    UnsupportedVersion(u8),
    #[error("corrupt campaign record: {0}")]
    Corrupt(String),
}

impl VersionedValue {
    pub const TYPE_NAME: &'static str = "dungeonbot::CampaignRecord";

    pub fn decode(data: &[u8]) -> Result<Self, RecordError> {
        let (&version, payload) = data.split_first().ok_or(RecordError::Empty)?;
        match version {
            v1::Value::VERSION => postcard::from_bytes::<v1::Value>(payload)
                .map(VersionedValue::V1)
                .map_err(|err| RecordError::Corrupt(err.to_string())),
            other => Err(RecordError::UnsupportedVersion(other)),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, RecordError> {
        match self {
            VersionedValue::V1(record) => postcard::to_extend(record, vec![v1::Value::VERSION])
                .map_err(|err| RecordError::Corrupt(err.to_string())),
        }
    }
}

impl redb::Value for VersionedValue {
    type SelfType<'a> = VersionedValue;
    type AsBytes<'a> = Vec<u8>;

    fn fixed_width() -> Option<usize> {
        None
    }

    // redb offers no error channel for decoding.
    fn from_bytes<'a>(data: &'a [u8]) -> Self::SelfType<'a>
    where
        Self: 'a,
    {
        Self::decode(data).unwrap_or_else(|err| panic!("{err}"))
    }

    fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Self::AsBytes<'a>
    where
        Self: 'b,
    {
        value.encode().unwrap_or_else(|err| panic!("{err}"))
    }

    fn type_name() -> TypeName {
        TypeName::new(Self::TYPE_NAME)
    }
}
