use serde::{Deserialize, Deserializer, Serialize};

/// One leave entry of a user, as served by the attendance backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaveRecord {
    #[serde(alias = "_id")]
    pub id: String,

    /// Day of month. Values outside the month's range never match a cell.
    pub date: u32,

    pub month: u32,

    pub year: i64,

    /// Empty when the backend sends `null` or leaves it out.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub session: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub reason: String,

    #[serde(default, rename = "reasonType", deserialize_with = "null_as_empty")]
    pub reason_type: String,
}

impl LeaveRecord {
    pub fn new(id: impl Into<String>, year: i64, month: u32, date: u32, session: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date,
            month,
            year,
            session: session.into(),
            reason: String::new(),
            reason_type: String::new(),
        }
    }

    pub fn is_in_month(&self, year: i64, month: u32) -> bool {
        self.year == year && self.month == month
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
