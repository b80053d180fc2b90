//! Declarative field rules checked against JSON records.

use serde_json::{Map, Value, json};

use crate::validation::{FieldViolation, LocSegment, ValidationErrors, ViolationKind};

/// One side of a numeric range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Limit {
    Inclusive(f64),
    Exclusive(f64),
}

/// Numeric range with optional bounds on either side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub lower: Option<Limit>,
    pub upper: Option<Limit>,
}

impl Range {
    pub const UNBOUNDED: Range = Range {
        lower: None,
        upper: None,
    };

    /// Open interval `(lower, upper)`.
    pub const fn open(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(Limit::Exclusive(lower)),
            upper: Some(Limit::Exclusive(upper)),
        }
    }

    /// Closed interval `[lower, upper]`.
    pub const fn closed(lower: f64, upper: f64) -> Self {
        Self {
            lower: Some(Limit::Inclusive(lower)),
            upper: Some(Limit::Inclusive(upper)),
        }
    }

    /// Message describing why `value` falls outside the range, if it does.
    pub fn check(&self, value: f64) -> Option<String> {
        if value.is_nan() {
            return Some("must be a number".to_string());
        }
        match self.lower {
            Some(Limit::Exclusive(min)) if value <= min => {
                return Some(format!("must be greater than {}", min));
            }
            Some(Limit::Inclusive(min)) if value < min => {
                return Some(format!("must be greater than or equal to {}", min));
            }
            _ => {}
        }
        match self.upper {
            Some(Limit::Exclusive(max)) if value >= max => Some(format!("must be less than {}", max)),
            Some(Limit::Inclusive(max)) if value > max => {
                Some(format!("must be less than or equal to {}", max))
            }
            _ => None,
        }
    }
}

/// Expected JSON shape of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Any JSON number.
    Float,
    /// A JSON integer.
    Integer,
    /// A whole number from a fixed set of wire values.
    Choice(&'static [i64]),
}

/// Rule for one named field of a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub range: Range,
}

impl FieldRule {
    pub const fn float(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Float,
            range: Range::UNBOUNDED,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Integer,
            range: Range::UNBOUNDED,
        }
    }

    pub const fn choice(name: &'static str, values: &'static [i64]) -> Self {
        Self {
            name,
            kind: FieldKind::Choice(values),
            range: Range::UNBOUNDED,
        }
    }

    pub const fn within(mut self, range: Range) -> Self {
        self.range = range;
        self
    }

    /// Check `value`, pushing every violation under `loc`.
    fn check(&self, value: &Value, loc: Vec<LocSegment>, errors: &mut ValidationErrors) {
        let number = match self.kind {
            FieldKind::Float => match value.as_f64() {
                Some(n) => n,
                None => {
                    errors.push(
                        FieldViolation::new(loc, ViolationKind::InvalidType, "must be a number")
                            .with_input(value.clone()),
                    );
                    return;
                }
            },
            FieldKind::Integer | FieldKind::Choice(_) => match value.as_i64() {
                Some(n) => {
                    if let FieldKind::Choice(values) = self.kind {
                        if !values.contains(&n) {
                            errors.push(
                                FieldViolation::new(
                                    loc,
                                    ViolationKind::InvalidChoice,
                                    format!("must be one of {:?}", values),
                                )
                                .with_input(value.clone()),
                            );
                            return;
                        }
                    }
                    n as f64
                }
                None => {
                    errors.push(
                        FieldViolation::new(loc, ViolationKind::InvalidType, "must be an integer")
                            .with_input(value.clone()),
                    );
                    return;
                }
            },
        };

        if let Some(message) = self.range.check(number) {
            errors.push(
                FieldViolation::new(loc, ViolationKind::OutOfRange, message).with_input(value.clone()),
            );
        }
    }
}

/// Check one JSON record against `rules`. Unknown keys are ignored.
///
/// Returns the record's object map when it is an object, even if some of its
/// fields were invalid, so callers can keep collecting violations.
pub fn check_record<'a>(
    record: &'a Value,
    rules: &[FieldRule],
    loc: &[LocSegment],
    errors: &mut ValidationErrors,
) -> Option<&'a Map<String, Value>> {
    let Some(object) = record.as_object() else {
        errors.push(
            FieldViolation::new(loc.to_vec(), ViolationKind::InvalidType, "must be an object")
                .with_input(record.clone()),
        );
        return None;
    };

    for rule in rules {
        let mut field_loc = loc.to_vec();
        field_loc.push(LocSegment::from(rule.name));
        match object.get(rule.name) {
            None => errors.push(FieldViolation::new(
                field_loc,
                ViolationKind::Missing,
                "field required",
            )),
            Some(value) => rule.check(value, field_loc, errors),
        }
    }

    Some(object)
}

/// Check that `items` has a length within `[min, max]`.
pub fn check_length(
    items: &[Value],
    min: usize,
    max: usize,
    loc: &[LocSegment],
    errors: &mut ValidationErrors,
) {
    if items.len() < min {
        errors.push(
            FieldViolation::new(
                loc.to_vec(),
                ViolationKind::TooShort,
                format!("must have at least {} item(s), found {}", min, items.len()),
            )
            .with_input(json!(items.len())),
        );
    } else if items.len() > max {
        errors.push(
            FieldViolation::new(
                loc.to_vec(),
                ViolationKind::TooLong,
                format!("must have at most {} item(s), found {}", max, items.len()),
            )
            .with_input(json!(items.len())),
        );
    }
}
