use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{LABEL_SEPARATOR, Month, ParseError, Year, prelude::*, types::parse_u16};

/// The `<startYear>-<endYear>` label of an academic year, e.g. `2024-2025`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{start}-{end}")]
pub struct AcademicYearLabel {
    start: Year,
    end: Year,
}

impl AcademicYearLabel {
    /// The academic start year (first token)
    pub const fn start(&self) -> Year {
        self.start
    }

    /// The second token; not checked against the start year
    pub const fn end(&self) -> Year {
        self.end
    }
}

impl FromStr for AcademicYearLabel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(LABEL_SEPARATOR).map(str::trim).collect();
        let [start, end] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(format!(
                "expected two '{LABEL_SEPARATOR}' separated years, found {} token(s) in {trimmed}",
                parts.len()
            )));
        };

        Ok(Self {
            start: Year::new(parse_u16(start)?)?,
            end: Year::new(parse_u16(end)?)?,
        })
    }
}

/// One configured academic year as listed by the lookup endpoint.
///
/// Records are owned by the server and never mutated here. A record whose
/// label or start month cannot be understood is still listed, it is just
/// never picked as a default (see [`AcademicYearRecord::candidate`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYearRecord {
    pub id: String,
    pub label: String,
    pub start_month: Option<Month>,
    pub end_month: Option<Month>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AcademicYearRecord {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        start_month: Option<Month>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            start_month,
            end_month: None,
            extra: Map::new(),
        }
    }

    /// Parses the display label
    ///
    /// # Errors
    /// Returns `ParseError` when the label is not two integer years.
    pub fn parsed_label(&self) -> Result<AcademicYearLabel, ParseError> {
        self.label.parse()
    }

    /// Academic start year and start month, if both are usable.
    pub fn candidate(&self) -> Option<(Year, Month)> {
        let label = self.parsed_label().ok()?;
        Some((label.start(), self.start_month?))
    }

    /// Decodes one `data` entry of the lookup response.
    ///
    /// `id` may arrive as a string or an integer. Unusable month fields become
    /// `None`. Returns `None` if the entry has no usable `id` or `label`.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut fields) = value else {
            return None;
        };

        let id = match fields.remove("id")? {
            Value::String(s) if !s.trim().is_empty() => s,
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let label = match fields.remove("label")? {
            Value::String(s) => s,
            _ => return None,
        };
        let start_month = fields.remove("startMonth").and_then(lenient_month);
        let end_month = fields.remove("endMonth").and_then(lenient_month);

        Some(Self {
            id,
            label,
            start_month,
            end_month,
            extra: fields,
        })
    }
}

/// Accepts integers and integer strings, anything else is unknown.
fn lenient_month(value: Value) -> Option<Month> {
    let raw = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    Month::new(u8::try_from(raw).ok()?).ok()
}

impl<'de> Deserialize<'de> for AcademicYearRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value)
            .ok_or_else(|| serde::de::Error::custom("academic year entry needs an id and a label"))
    }
}
