//! Shared constraint structures (spec §3.2). `BoundedRange`/`Bound` are the
//! single range envelope every size/value constraint is built from, the way
//! `regorus::schema::Type` keeps `minimum`/`maximum` as plain `Option<T>`
//! pairs per variant — except here the pair is factored into one reusable
//! generic type because the same "two optional bounds, five operators"
//! shape recurs across text length, list size, numeric value and binary size.

use rust_decimal::Decimal;

/// The operator a [`Bound`] was written with. `Exact` only ever appears on
/// the `min` side of a [`BoundedRange`] in canonical form (spec §3.4); a
/// parser or translator producing `max: Some(Bound{op: Exact, ..})` is a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundOp {
    Exact,
    MinInclusive,
    MinExclusive,
    MaxInclusive,
    MaxExclusive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bound<V> {
    pub op: BoundOp,
    pub value: V,
}

impl<V> Bound<V> {
    pub fn new(op: BoundOp, value: V) -> Self {
        Self { op, value }
    }
}

impl<V: PartialOrd> Bound<V> {
    fn satisfied_as_min(&self, v: &V) -> bool {
        match self.op {
            BoundOp::Exact | BoundOp::MinInclusive => v >= &self.value,
            BoundOp::MinExclusive => v > &self.value,
            // A MaxInclusive/MaxExclusive bound stored on the min side never
            // happens in canonical schemas; treat permissively.
            BoundOp::MaxInclusive | BoundOp::MaxExclusive => true,
        }
    }

    fn satisfied_as_max(&self, v: &V) -> bool {
        match self.op {
            BoundOp::Exact | BoundOp::MaxInclusive => v <= &self.value,
            BoundOp::MaxExclusive => v < &self.value,
            BoundOp::MinInclusive | BoundOp::MinExclusive => true,
        }
    }
}

/// A min/max envelope shared by every range-bearing constraint (spec
/// GLOSSARY). Empty (`min: None, max: None`) means unconstrained.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundedRange<V> {
    pub min: Option<Bound<V>>,
    pub max: Option<Bound<V>>,
}

impl<V> BoundedRange<V> {
    pub fn empty() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

impl<V: Clone> BoundedRange<V> {
    /// Merge two ranges. When a side is set on only one of the two, that
    /// side wins regardless of order (spec §8.1 "merge commutativity").
    /// When both set the same side, `self`'s side wins — an intentional,
    /// documented asymmetry (spec §8.1): `a.merge(b) != b.merge(a)` whenever
    /// both constrain the same side differently.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.clone().or_else(|| other.min.clone()),
            max: self.max.clone().or_else(|| other.max.clone()),
        }
    }
}

impl<V: PartialOrd> BoundedRange<V> {
    /// Whether `v` falls within the range. If `min > max` (a malformed but
    /// not parser-rejected range, spec §3.4) the range is treated as empty —
    /// nothing satisfies it.
    pub fn contains(&self, v: &V) -> bool {
        if let (Some(min), Some(max)) = (&self.min, &self.max) {
            if min.value > max.value {
                return false;
            }
        }
        self.min.as_ref().map_or(true, |b| b.satisfied_as_min(v))
            && self.max.as_ref().map_or(true, |b| b.satisfied_as_max(v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryEncoding {
    Hex,
    Base64,
    Base32,
    Base58,
    Ascii85,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    Iso8601,
    Iso8601DateTime,
    Iso8601Date,
    Iso8601Time,
    Rfc3339,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimeConstraint {
    Named(TimeFormat),
    Pattern(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Uniqueness {
    Simple,
    /// A composite key over these object fields (len > 1 means composite);
    /// multiple `ByFields` entries in one `ListConstraints` are independent
    /// constraints, not alternative keys (spec §9 resolves the ambiguity
    /// this way).
    ByFields(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextConstraints {
    pub size: Option<BoundedRange<i64>>,
    pub regex: Option<String>,
    /// Glyph alphabet per spec §3.2: `#`=digit, `X`=letter, `@`=alphanumeric,
    /// `*`=any, anything else is a literal character.
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumericConstraints {
    pub value: Option<BoundedRange<Decimal>>,
    pub integer: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BinaryConstraints {
    pub size: Option<BoundedRange<u64>>,
    pub encoding: Option<BinaryEncoding>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListConstraints {
    pub size: Option<BoundedRange<i64>>,
    pub unique: Vec<Uniqueness>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_commutative_on_disjoint_sides() {
        let a: BoundedRange<i64> = BoundedRange {
            min: Some(Bound::new(BoundOp::MinInclusive, 1)),
            max: None,
        };
        let b: BoundedRange<i64> = BoundedRange {
            min: None,
            max: Some(Bound::new(BoundOp::MaxInclusive, 10)),
        };
        assert_eq!(a.merge(&b), b.merge(&a));
    }

    #[test]
    fn merge_prefers_self_on_overlap() {
        let a: BoundedRange<i64> = BoundedRange {
            min: Some(Bound::new(BoundOp::MinInclusive, 1)),
            max: None,
        };
        let b: BoundedRange<i64> = BoundedRange {
            min: Some(Bound::new(BoundOp::MinInclusive, 5)),
            max: None,
        };
        assert_eq!(a.merge(&b).min.unwrap().value, 1);
        assert_eq!(b.merge(&a).min.unwrap().value, 5);
    }

    #[test]
    fn contains_respects_inclusive_exclusive() {
        let r: BoundedRange<i64> = BoundedRange {
            min: Some(Bound::new(BoundOp::MinInclusive, 1)),
            max: Some(Bound::new(BoundOp::MaxExclusive, 10)),
        };
        assert!(r.contains(&1));
        assert!(!r.contains(&10));
        assert!(r.contains(&9));
    }

    #[test]
    fn inverted_range_contains_nothing() {
        let r: BoundedRange<i64> = BoundedRange {
            min: Some(Bound::new(BoundOp::MinInclusive, 10)),
            max: Some(Bound::new(BoundOp::MaxInclusive, 1)),
        };
        assert!(!r.contains(&5));
    }
}
