//! Shapes: the declarations attached to one kind of record.
//!
//! A [`Shape`] is built once, registered, and then only read. Declarations are
//! kept in typed lists per role, so the engine never has to sort attributes at
//! validation time.
//!
//! ```rust,ignore
//! let booking = Shape::builder("Booking")
//!     .start("check_in", StartDate::default())
//!     .end("check_out", EndDate::default().minimum_days(1))
//!     .nested("rooms", NestedTarget::Collection("Room".into()))
//!     .constraint("contact", Constraint::email(Email::new()))
//!     .build();
//! ```

mod declaration;

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

pub use declaration::{
    Constraint, CorrelationId, EndDate, NestedTarget, Role, Rule, StartDate,
};

// ============================================================================
// SHAPE ID
// ============================================================================

/// Name of a record shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(Cow<'static, str>);

impl ShapeId {
    /// Creates a shape id.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Creates a shape id from a static name without allocating.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// The shape name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ShapeId {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for ShapeId {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

// ============================================================================
// SHAPE
// ============================================================================

/// One declaration bound to an attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<D> {
    /// Attribute name passed to [`Record::read`](crate::value::Record::read).
    pub name: Cow<'static, str>,
    /// The declaration.
    pub declaration: D,
}

/// Declarations for one kind of record.
#[derive(Debug, Clone)]
pub struct Shape {
    id: ShapeId,
    starts: Vec<Attribute<StartDate>>,
    ends: Vec<Attribute<EndDate>>,
    nesteds: Vec<Attribute<NestedTarget>>,
    constraints: Vec<Attribute<Constraint>>,
    conforms_to: Vec<ShapeId>,
}

impl Shape {
    /// Starts building a shape.
    pub fn builder(id: impl Into<ShapeId>) -> ShapeBuilder {
        ShapeBuilder {
            shape: Self {
                id: id.into(),
                starts: Vec::new(),
                ends: Vec::new(),
                nesteds: Vec::new(),
                constraints: Vec::new(),
                conforms_to: Vec::new(),
            },
        }
    }

    /// Shape id.
    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    /// Start-date declarations in declaration order.
    pub fn starts(&self) -> &[Attribute<StartDate>] {
        &self.starts
    }

    /// End-date declarations in declaration order.
    pub fn ends(&self) -> &[Attribute<EndDate>] {
        &self.ends
    }

    /// Nested declarations in declaration order.
    pub fn nesteds(&self) -> &[Attribute<NestedTarget>] {
        &self.nesteds
    }

    /// Field constraints in declaration order.
    pub fn constraints(&self) -> &[Attribute<Constraint>] {
        &self.constraints
    }

    /// Shapes this one may stand in for.
    pub fn conforms_to(&self) -> &[ShapeId] {
        &self.conforms_to
    }

    /// Returns `true` when this shape has nothing to check.
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
            && self.ends.is_empty()
            && self.nesteds.is_empty()
            && self.constraints.is_empty()
    }

    /// Reports malformed date-range usage.
    ///
    /// None of these fail validation: the affected range is always treated as
    /// satisfied. They are surfaced here so the mistake can be caught when the
    /// registry is built.
    pub fn lint(&self) -> Vec<Diagnostic> {
        let mut starts: BTreeMap<CorrelationId, Vec<&str>> = BTreeMap::new();
        for start in &self.starts {
            starts
                .entry(start.declaration.correlation)
                .or_default()
                .push(&start.name);
        }
        let mut ends: BTreeMap<CorrelationId, Vec<&str>> = BTreeMap::new();
        for end in &self.ends {
            ends.entry(end.declaration.correlation)
                .or_default()
                .push(&end.name);
        }

        let mut diagnostics = Vec::new();
        for (&correlation, names) in &starts {
            if names.len() > 1 {
                diagnostics.push(Diagnostic::new(DiagnosticKind::DuplicateStart, correlation, names));
            }
            if !ends.contains_key(&correlation) {
                diagnostics.push(Diagnostic::new(DiagnosticKind::OrphanStart, correlation, names));
            }
        }
        for (&correlation, names) in &ends {
            if names.len() > 1 {
                diagnostics.push(Diagnostic::new(DiagnosticKind::DuplicateEnd, correlation, names));
            }
            if !starts.contains_key(&correlation) {
                diagnostics.push(Diagnostic::new(DiagnosticKind::OrphanEnd, correlation, names));
            }
        }
        diagnostics
    }

    /// Roles declared on `attribute`, starts first. One attribute may end one
    /// range and start another.
    pub fn roles(&self, attribute: &str) -> Vec<Role> {
        let starts = self.starts.iter().filter(|a| a.name == attribute).map(|_| Role::Start);
        let ends = self.ends.iter().filter(|a| a.name == attribute).map(|_| Role::End);
        let nesteds = self
            .nesteds
            .iter()
            .filter(|a| a.name == attribute)
            .map(|_| Role::Nested);
        starts.chain(ends).chain(nesteds).collect()
    }

    /// Correlation ids that have both a start and an end.
    pub fn correlations(&self) -> BTreeSet<CorrelationId> {
        let ends: BTreeSet<_> = self.ends.iter().map(|e| e.declaration.correlation).collect();
        self.starts
            .iter()
            .map(|s| s.declaration.correlation)
            .filter(|c| ends.contains(c))
            .collect()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Fluent builder for [`Shape`].
#[derive(Debug, Clone)]
#[must_use = "builder methods must be chained or built"]
pub struct ShapeBuilder {
    shape: Shape,
}

impl ShapeBuilder {
    /// Declares `attribute` as a range start.
    pub fn start(mut self, attribute: impl Into<Cow<'static, str>>, start: StartDate) -> Self {
        self.shape.starts.push(Attribute {
            name: attribute.into(),
            declaration: start,
        });
        self
    }

    /// Declares `attribute` as a range end.
    pub fn end(mut self, attribute: impl Into<Cow<'static, str>>, end: EndDate) -> Self {
        self.shape.ends.push(Attribute {
            name: attribute.into(),
            declaration: end,
        });
        self
    }

    /// Declares `attribute` as a nested record or collection.
    pub fn nested(mut self, attribute: impl Into<Cow<'static, str>>, target: NestedTarget) -> Self {
        self.shape.nesteds.push(Attribute {
            name: attribute.into(),
            declaration: target,
        });
        self
    }

    /// Attaches a field constraint to `attribute`.
    pub fn constraint(
        mut self,
        attribute: impl Into<Cow<'static, str>>,
        constraint: Constraint,
    ) -> Self {
        self.shape.constraints.push(Attribute {
            name: attribute.into(),
            declaration: constraint,
        });
        self
    }

    /// Lets records of this shape stand in for `other` in nested declarations.
    pub fn conforms_to(mut self, other: impl Into<ShapeId>) -> Self {
        self.shape.conforms_to.push(other.into());
        self
    }

    /// Finishes the shape.
    pub fn build(self) -> Shape {
        self.shape
    }
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

/// Kind of malformed date-range usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A start with no end on the same correlation id.
    OrphanStart,
    /// An end with no start on the same correlation id.
    OrphanEnd,
    /// Two starts on one correlation id.
    DuplicateStart,
    /// Two ends on one correlation id.
    DuplicateEnd,
}

/// One finding from [`Shape::lint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What is wrong.
    pub kind: DiagnosticKind,
    /// Affected correlation id.
    pub correlation: CorrelationId,
    /// Attributes involved, in declaration order.
    pub attributes: Vec<String>,
}

impl Diagnostic {
    fn new(kind: DiagnosticKind, correlation: CorrelationId, attributes: &[&str]) -> Self {
        Self {
            kind,
            correlation,
            attributes: attributes.iter().map(|&a| a.to_owned()).collect(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            DiagnosticKind::OrphanStart => "start without end",
            DiagnosticKind::OrphanEnd => "end without start",
            DiagnosticKind::DuplicateStart => "more than one start",
            DiagnosticKind::DuplicateEnd => "more than one end",
        };
        write!(
            f,
            "range {}: {what} ({})",
            self.correlation,
            self.attributes.join(", ")
        )
    }
}
