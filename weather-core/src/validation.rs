//! Form validation: raw text inputs in, a [`Query`] or per-field messages out.

use std::{collections::BTreeMap, fmt};

use chrono::{Local, NaiveDate};

use crate::model::Query;

pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// Form field an error is reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Latitude,
    Longitude,
    StartDate,
    EndDate,
    /// The start/end pair as a whole.
    DateRange,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
            Field::StartDate => "startDate",
            Field::EndDate => "endDate",
            Field::DateRange => "dateRange",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw, unparsed form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryForm {
    pub latitude: String,
    pub longitude: String,
    pub start_date: String,
    pub end_date: String,
}

impl QueryForm {
    pub fn new(
        latitude: impl Into<String>,
        longitude: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }
}

/// Every field-level problem found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Wall-clock calendar date used for the "not in the future" rule.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Validate raw form inputs against today's date.
pub fn validate(form: &QueryForm) -> Result<Query, ValidationErrors> {
    validate_at(form, today())
}

/// Validate raw form inputs against an explicit "today".
///
/// All four fields are checked independently so several errors can be
/// reported at once.
pub fn validate_at(form: &QueryForm, today: NaiveDate) -> Result<Query, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let latitude = parse_coordinate(&form.latitude, LATITUDE_RANGE);
    if latitude.is_none() {
        errors.insert(Field::Latitude, "Please enter a valid latitude (-90 to 90)");
    }

    let longitude = parse_coordinate(&form.longitude, LONGITUDE_RANGE);
    if longitude.is_none() {
        errors.insert(Field::Longitude, "Please enter a valid longitude (-180 to 180)");
    }

    let start = parse_date(&form.start_date, Field::StartDate, "Start date", &mut errors);
    let end = parse_date(&form.end_date, Field::EndDate, "End date", &mut errors);

    if let (Some(start), Some(end)) = (start, end) {
        if !date_range_ok(start, end, today) {
            errors.insert(Field::DateRange, DATE_RANGE_MESSAGE);
        }
    }

    match (latitude, longitude, start, end) {
        (Some(latitude), Some(longitude), Some(start_date), Some(end_date)) if errors.is_empty() => {
            Ok(Query { latitude, longitude, start_date, end_date })
        }
        _ => Err(errors),
    }
}

const DATE_RANGE_MESSAGE: &str = "End date must be after start date and not in the future";

/// Range checks for already-parsed values.
pub(crate) fn check_query(
    latitude: f64,
    longitude: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
    today: NaiveDate,
) -> Result<Query, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if !in_range(latitude, LATITUDE_RANGE) {
        errors.insert(Field::Latitude, "Please enter a valid latitude (-90 to 90)");
    }
    if !in_range(longitude, LONGITUDE_RANGE) {
        errors.insert(Field::Longitude, "Please enter a valid longitude (-180 to 180)");
    }
    if !date_range_ok(start_date, end_date, today) {
        errors.insert(Field::DateRange, DATE_RANGE_MESSAGE);
    }

    if errors.is_empty() {
        Ok(Query { latitude, longitude, start_date, end_date })
    } else {
        Err(errors)
    }
}

fn parse_coordinate(raw: &str, range: (f64, f64)) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| in_range(*v, range))
}

fn in_range(value: f64, (min, max): (f64, f64)) -> bool {
    value.is_finite() && value >= min && value <= max
}

fn parse_date(raw: &str, field: Field, name: &str, errors: &mut ValidationErrors) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.insert(field, format!("{name} is required"));
        return None;
    }

    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.insert(field, format!("{name} must be a valid date (YYYY-MM-DD)"));
            None
        }
    }
}

fn date_range_ok(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> bool {
    start <= end && end <= today
}
