//! Role-gated disclosure of analysis output.
//!
//! One table maps clearance level to the fields a requester may see. Each
//! level discloses a strict superset of the level below it. The filter is a
//! pure function of its inputs.

use serde::Serialize;
use threatlens_common::Entity;

use crate::role::Role;

/// Which output fields a clearance level may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Visibility {
    pub content: bool,
    pub entity_count: bool,
    pub entities: bool,
    pub risk_details: bool,
}

impl Visibility {
    /// Names of the fields this visibility discloses, in a fixed order.
    pub fn fields(&self) -> Vec<&'static str> {
        [
            ("content", self.content),
            ("entity_count", self.entity_count),
            ("entities", self.entities),
            ("risk_details", self.risk_details),
        ]
        .into_iter()
        .filter_map(|(name, visible)| visible.then_some(name))
        .collect()
    }

    pub fn is_subset_of(&self, other: &Visibility) -> bool {
        (!self.content || other.content)
            && (!self.entity_count || other.entity_count)
            && (!self.entities || other.entities)
            && (!self.risk_details || other.risk_details)
    }
}

/// Indexed by `level - 1`.
const POLICY: [Visibility; 4] = [
    // Observer
    Visibility { content: false, entity_count: false, entities: false, risk_details: false },
    // Analyst
    Visibility { content: true,  entity_count: true,  entities: false, risk_details: false },
    // Commander
    Visibility { content: true,  entity_count: true,  entities: true,  risk_details: false },
    // Operative
    Visibility { content: true,  entity_count: true,  entities: true,  risk_details: true  },
];

/// Description and evidence behind a risk level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskDetails {
    pub description: String,
    pub evidence: String,
}

/// The role-filtered projection returned to a requester.
///
/// Redacted fields are `None`; redacted entities are an empty list, with
/// `visibility.entities` telling "redacted" apart from "none found".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisclosureView {
    pub role: Role,
    pub visibility: Visibility,
    pub content: Option<String>,
    pub entity_count: Option<usize>,
    pub entities: Vec<Entity>,
    pub risk_details: Option<RiskDetails>,
}

impl DisclosureView {
    pub fn populated_fields(&self) -> Vec<&'static str> {
        self.visibility.fields()
    }
}

pub struct DisclosurePolicy;

impl DisclosurePolicy {
    pub fn visibility(role: Role) -> Visibility {
        POLICY[usize::from(role.level()) - 1]
    }

    pub fn disclose(
        role: Role,
        content: &str,
        entities: &[Entity],
        risk_details: &RiskDetails,
    ) -> DisclosureView {
        let visibility = Self::visibility(role);
        DisclosureView {
            role,
            visibility,
            content: visibility.content.then(|| content.to_string()),
            entity_count: visibility.entity_count.then_some(entities.len()),
            entities: if visibility.entities { entities.to_vec() } else { Vec::new() },
            risk_details: visibility.risk_details.then(|| risk_details.clone()),
        }
    }

    /// Same as [`disclose`](Self::disclose) for a raw role name; unknown
    /// names get the Observer view.
    pub fn disclose_for(
        role_name: &str,
        content: &str,
        entities: &[Entity],
        risk_details: &RiskDetails,
    ) -> DisclosureView {
        Self::disclose(Role::from_name(role_name), content, entities, risk_details)
    }
}
