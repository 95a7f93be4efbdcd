//! Lexical and semantic relation operators.
//!
//! Queries may follow a relation before matching: `<\::virtus>` asks for the
//! words a lemma derives from, `[@::courage]` for the hypernyms of a sense.
//! Lexical relations hold between lemmas and are only legal inside `<...>`;
//! semantic relations hold between synsets and are only legal inside `[...]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CylleneusError, Result};

/// Which kind of lexicon entries a relation connects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    /// Between lemmas.
    Lexical,
    /// Between synsets.
    Semantic,
}

/// A relation operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    Hypernym,
    Hyponym,
    MemberHolonym,
    SubstanceHolonym,
    PartHolonym,
    MemberMeronym,
    SubstanceMeronym,
    PartMeronym,
    Attribute,
    Entailment,
    Cause,
    AlsoSee,
    VerbGroup,
    SimilarTo,
    DerivesFrom,
    DerivedForm,
    ComposedOf,
    Composes,
    Antonym,
    DerivationallyRelated,
    ParticipleOf,
}

const ALL: [Relation; 21] = [
    Relation::Hypernym,
    Relation::Hyponym,
    Relation::MemberHolonym,
    Relation::SubstanceHolonym,
    Relation::PartHolonym,
    Relation::MemberMeronym,
    Relation::SubstanceMeronym,
    Relation::PartMeronym,
    Relation::Attribute,
    Relation::Entailment,
    Relation::Cause,
    Relation::AlsoSee,
    Relation::VerbGroup,
    Relation::SimilarTo,
    Relation::DerivesFrom,
    Relation::DerivedForm,
    Relation::ComposedOf,
    Relation::Composes,
    Relation::Antonym,
    Relation::DerivationallyRelated,
    Relation::ParticipleOf,
];

/// Separator between a relation operator and its operand.
pub const SEPARATOR: &str = "::";

impl Relation {
    /// All relations.
    pub fn all() -> impl Iterator<Item = Relation> {
        ALL.into_iter()
    }

    /// Look a relation up by its operator symbol.
    pub fn from_symbol(symbol: &str) -> Option<Relation> {
        ALL.into_iter().find(|relation| relation.symbol() == symbol)
    }

    /// The operator symbol.
    pub fn symbol(self) -> &'static str {
        use Relation::*;
        match self {
            Hypernym => "@",
            Hyponym => "~",
            MemberHolonym => "#m",
            SubstanceHolonym => "#s",
            PartHolonym => "#p",
            MemberMeronym => "%m",
            SubstanceMeronym => "%s",
            PartMeronym => "%p",
            Attribute => "=",
            Entailment => "*",
            Cause => ">",
            AlsoSee => "^",
            VerbGroup => "$",
            SimilarTo => "&",
            DerivesFrom => "\\",
            DerivedForm => "/",
            ComposedOf => "+c",
            Composes => "-c",
            Antonym => "!",
            DerivationallyRelated => "+",
            ParticipleOf => "<",
        }
    }

    /// Whether the relation connects lemmas or synsets.
    pub fn kind(self) -> RelationKind {
        use Relation::*;
        match self {
            DerivesFrom | DerivedForm | ComposedOf | Composes | Antonym | DerivationallyRelated
            | ParticipleOf => RelationKind::Lexical,
            Hypernym | Hyponym | MemberHolonym | SubstanceHolonym | PartHolonym | MemberMeronym
            | SubstanceMeronym | PartMeronym | Attribute | Entailment | Cause | AlsoSee | VerbGroup
            | SimilarTo => RelationKind::Semantic,
        }
    }

    /// The relation in the opposite direction, where the lexicon defines one.
    pub fn inverse(self) -> Option<Relation> {
        use Relation::*;
        let inverse = match self {
            Hypernym => Hyponym,
            Hyponym => Hypernym,
            MemberHolonym => MemberMeronym,
            SubstanceHolonym => SubstanceMeronym,
            PartHolonym => PartMeronym,
            MemberMeronym => MemberHolonym,
            SubstanceMeronym => SubstanceHolonym,
            PartMeronym => PartHolonym,
            DerivesFrom => DerivedForm,
            DerivedForm => DerivesFrom,
            ComposedOf => Composes,
            Composes => ComposedOf,
            Antonym => Antonym,
            SimilarTo => SimilarTo,
            DerivationallyRelated => DerivationallyRelated,
            _ => return None,
        };
        Some(inverse)
    }

    /// Split `REL::operand` into its relation and operand.
    ///
    /// Returns `Ok(None)` when the text carries no `::` separator, and an
    /// error when the operator is unknown.
    pub fn split(text: &str) -> Result<Option<(Relation, &str)>> {
        let Some((symbol, operand)) = text.split_once(SEPARATOR) else {
            return Ok(None);
        };
        let relation = symbol.parse::<Relation>()?;
        Ok(Some((relation, operand)))
    }
}

impl FromStr for Relation {
    type Err = CylleneusError;

    fn from_str(s: &str) -> Result<Self> {
        Relation::from_symbol(s)
            .ok_or_else(|| CylleneusError::query(format!("unknown relation operator '{s}'")))
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
