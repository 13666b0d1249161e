use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::{FetchError, LookupSource};
use crate::{AcademicYearRecord, Month, Today, Year};

pub fn year(y: u16) -> Year {
    Year::new(y).expect("valid year")
}

pub fn month(m: u8) -> Month {
    Month::new(m).expect("valid month")
}

pub fn today(y: u16, m: u8) -> Today {
    Today::new(year(y), month(m))
}

pub fn record(id: &str, label: &str, start_month: u8) -> AcademicYearRecord {
    AcademicYearRecord::new(id, label, Some(month(start_month)))
}

type ErrorFactory = Box<dyn Fn() -> FetchError + Send + Sync>;

enum Outcome {
    Records(Vec<AcademicYearRecord>),
    Error(ErrorFactory),
}

/// In-memory lookup source that remembers how it was called.
pub struct StubSource {
    outcome: Mutex<Outcome>,
    tokens: Mutex<Vec<String>>,
}

impl StubSource {
    pub fn ok(records: Vec<AcademicYearRecord>) -> Self {
        Self {
            outcome: Mutex::new(Outcome::Records(records)),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: impl Fn() -> FetchError + Send + Sync + 'static) -> Self {
        Self {
            outcome: Mutex::new(Outcome::Error(Box::new(error))),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn set_records(&self, records: Vec<AcademicYearRecord>) {
        *self.outcome.lock() = Outcome::Records(records);
    }

    pub fn calls(&self) -> usize {
        self.tokens.lock().len()
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens.lock().clone()
    }
}

#[async_trait]
impl LookupSource for StubSource {
    async fn academic_years(&self, token: &str) -> Result<Vec<AcademicYearRecord>, FetchError> {
        self.tokens.lock().push(token.to_owned());
        match &*self.outcome.lock() {
            Outcome::Records(records) => Ok(records.clone()),
            Outcome::Error(make) => Err(make()),
        }
    }
}
