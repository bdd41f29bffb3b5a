//! Role-based permission gate with two-phase manager approval

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::providers::{Credential, IdentityProvider};
use shared::models::Operator;

/// Sensitive actions governed by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitiveAction {
    VoidItems,
    PriceOverride,
    ApplyDiscount,
}

impl std::fmt::Display for SensitiveAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensitiveAction::VoidItems => write!(f, "void_items"),
            SensitiveAction::PriceOverride => write!(f, "price_override"),
            SensitiveAction::ApplyDiscount => write!(f, "apply_discount"),
        }
    }
}

/// The magnitude being requested, compared against role ceilings
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateValue {
    /// Percentage discount (0-100)
    Percent(f64),
    /// Fixed discount or price-override markdown amount
    Amount(f64),
}

/// Gate decision: either the actor may proceed directly, or a manager
/// credential is required first
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Allowed,
    RequiresApproval { reason: String },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allowed)
    }
}

/// Errors from the approval flow
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GateError {
    #[error("approval denied: {0}")]
    ApprovalDenied(String),
}

impl From<GateError> for shared::error::AppError {
    fn from(err: GateError) -> Self {
        shared::error::AppError::with_message(
            shared::error::ErrorCode::ApprovalDenied,
            err.to_string(),
        )
    }
}

/// Pending approval request, handed to the manager-credential prompt
#[derive(Debug, Clone)]
pub struct ApprovalToken {
    pub token_id: String,
    pub action: SensitiveAction,
    pub value: Option<GateValue>,
    /// Operator whose request exceeded their authority
    pub requested_by: Operator,
    /// Why approval is needed (shown in the prompt)
    pub reason: String,
}

/// A granted approval. Carries the approving identity - that identity,
/// not the original requester, lands in the audit entry.
#[derive(Debug, Clone)]
pub struct Approval {
    pub token_id: String,
    pub action: SensitiveAction,
    pub value: Option<GateValue>,
    pub approver: Operator,
}

/// Role-based permission gate
#[derive(Debug, Clone)]
pub struct PermissionGate {
    config: EngineConfig,
}

impl PermissionGate {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Check whether `role` may perform `action` at `value` directly.
    pub fn check(
        &self,
        action: SensitiveAction,
        role: shared::models::Role,
        value: Option<&GateValue>,
    ) -> GateDecision {
        let policy = self.config.policy(role);
        let decision = match action {
            SensitiveAction::VoidItems => {
                if policy.can_void {
                    GateDecision::Allowed
                } else {
                    GateDecision::RequiresApproval {
                        reason: format!("{} may not void items", role),
                    }
                }
            }
            SensitiveAction::PriceOverride => {
                if !policy.can_override_price {
                    GateDecision::RequiresApproval {
                        reason: format!("{} may not override prices", role),
                    }
                } else {
                    self.check_ceiling(&policy.discount_ceiling, role, value)
                }
            }
            SensitiveAction::ApplyDiscount => {
                self.check_ceiling(&policy.discount_ceiling, role, value)
            }
        };
        debug!(action = %action, %role, ?value, allowed = decision.is_allowed(), "gate check");
        decision
    }

    fn check_ceiling(
        &self,
        ceiling: &crate::config::DiscountCeiling,
        role: shared::models::Role,
        value: Option<&GateValue>,
    ) -> GateDecision {
        match value {
            Some(GateValue::Percent(percent)) => match ceiling.max_percent {
                Some(max) if *percent > max => GateDecision::RequiresApproval {
                    reason: format!("exceeds role limit of {}% for {}", max, role),
                },
                _ => GateDecision::Allowed,
            },
            Some(GateValue::Amount(amount)) => match ceiling.max_amount {
                Some(max) if *amount > max => GateDecision::RequiresApproval {
                    reason: format!("exceeds role limit of ${:.2} for {}", max, role),
                },
                _ => GateDecision::Allowed,
            },
            None => GateDecision::Allowed,
        }
    }

    /// Start the second phase after a `RequiresApproval` decision.
    pub fn request_approval(
        &self,
        action: SensitiveAction,
        value: Option<GateValue>,
        requested_by: &Operator,
        reason: impl Into<String>,
    ) -> ApprovalToken {
        ApprovalToken {
            token_id: uuid::Uuid::new_v4().to_string(),
            action,
            value,
            requested_by: requested_by.clone(),
            reason: reason.into(),
        }
    }

    /// Resolve a pending approval with a second, distinct credential.
    ///
    /// The credential must verify to an operator different from the
    /// requester, and that operator must pass the same gate check the
    /// requester failed.
    pub fn approve(
        &self,
        token: ApprovalToken,
        credential: &Credential,
        identities: &dyn IdentityProvider,
    ) -> Result<Approval, GateError> {
        let approver = identities.verify_credential(credential).ok_or_else(|| {
            warn!(action = %token.action, "approval credential rejected");
            GateError::ApprovalDenied("credential rejected".to_string())
        })?;

        if approver.id == token.requested_by.id {
            return Err(GateError::ApprovalDenied(
                "approval requires a second operator".to_string(),
            ));
        }

        match self.check(token.action, approver.role, token.value.as_ref()) {
            GateDecision::Allowed => {
                debug!(
                    action = %token.action,
                    approver = %approver.name,
                    "approval granted"
                );
                Ok(Approval {
                    token_id: token.token_id,
                    action: token.action,
                    value: token.value,
                    approver,
                })
            }
            GateDecision::RequiresApproval { .. } => Err(GateError::ApprovalDenied(format!(
                "{} lacks authority for {}",
                approver.name, token.action
            ))),
        }
    }

    /// Whether a granted approval covers the given action and value.
    /// Consulted by the manager right before the mutation applies.
    pub fn verify_approval(
        &self,
        approval: &Approval,
        action: SensitiveAction,
        value: Option<&GateValue>,
    ) -> bool {
        approval.action == action && approval.value.as_ref() == value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::InMemoryIdentities;
    use shared::models::Role;

    fn operator(id: &str, role: Role) -> Operator {
        Operator {
            id: id.to_string(),
            name: format!("Operator {}", id),
            role,
        }
    }

    fn gate() -> PermissionGate {
        PermissionGate::new(EngineConfig::default())
    }

    #[test]
    fn cashier_within_ceiling_allowed() {
        let decision = gate().check(
            SensitiveAction::ApplyDiscount,
            Role::Cashier,
            Some(&GateValue::Percent(10.0)),
        );
        assert!(decision.is_allowed());
    }

    #[test]
    fn cashier_beyond_ceiling_requires_approval() {
        let decision = gate().check(
            SensitiveAction::ApplyDiscount,
            Role::Cashier,
            Some(&GateValue::Percent(25.0)),
        );
        match decision {
            GateDecision::RequiresApproval { reason } => {
                assert!(reason.contains("10%"), "got: {}", reason);
            }
            GateDecision::Allowed => panic!("expected RequiresApproval"),
        }
    }

    #[test]
    fn cashier_fixed_amount_ceiling() {
        let g = gate();
        assert!(g
            .check(
                SensitiveAction::ApplyDiscount,
                Role::Cashier,
                Some(&GateValue::Amount(20.0)),
            )
            .is_allowed());
        assert!(!g
            .check(
                SensitiveAction::ApplyDiscount,
                Role::Cashier,
                Some(&GateValue::Amount(20.01)),
            )
            .is_allowed());
    }

    #[test]
    fn manager_ceiling_is_wider() {
        let g = gate();
        assert!(g
            .check(
                SensitiveAction::ApplyDiscount,
                Role::Manager,
                Some(&GateValue::Percent(50.0)),
            )
            .is_allowed());
        assert!(!g
            .check(
                SensitiveAction::ApplyDiscount,
                Role::Manager,
                Some(&GateValue::Percent(60.0)),
            )
            .is_allowed());
    }

    #[test]
    fn admin_is_unlimited() {
        let decision = gate().check(
            SensitiveAction::ApplyDiscount,
            Role::Admin,
            Some(&GateValue::Percent(100.0)),
        );
        assert!(decision.is_allowed());
    }

    #[test]
    fn cashier_void_requires_approval() {
        assert!(!gate()
            .check(SensitiveAction::VoidItems, Role::Cashier, None)
            .is_allowed());
        assert!(gate()
            .check(SensitiveAction::VoidItems, Role::Manager, None)
            .is_allowed());
    }

    #[test]
    fn approval_flow_records_the_approver() {
        let g = gate();
        let cashier = operator("cashier-1", Role::Cashier);
        let mut identities = InMemoryIdentities::new();
        identities.register("1234", operator("mgr-1", Role::Manager));

        let token = g.request_approval(
            SensitiveAction::ApplyDiscount,
            Some(GateValue::Percent(25.0)),
            &cashier,
            "exceeds role limit of 10%",
        );
        let approval = g
            .approve(token, &Credential::pin("1234"), &identities)
            .unwrap();

        assert_eq!(approval.approver.id, "mgr-1");
        assert!(g.verify_approval(
            &approval,
            SensitiveAction::ApplyDiscount,
            Some(&GateValue::Percent(25.0)),
        ));
        // An approval never covers a different magnitude
        assert!(!g.verify_approval(
            &approval,
            SensitiveAction::ApplyDiscount,
            Some(&GateValue::Percent(50.0)),
        ));
    }

    #[test]
    fn bad_credential_denied() {
        let g = gate();
        let cashier = operator("cashier-1", Role::Cashier);
        let identities = InMemoryIdentities::new();

        let token = g.request_approval(SensitiveAction::VoidItems, None, &cashier, "no authority");
        assert!(matches!(
            g.approve(token, &Credential::pin("0000"), &identities),
            Err(GateError::ApprovalDenied(_))
        ));
    }

    #[test]
    fn self_approval_denied() {
        let g = gate();
        let cashier = operator("cashier-1", Role::Cashier);
        let mut identities = InMemoryIdentities::new();
        identities.register("1234", cashier.clone());

        let token = g.request_approval(SensitiveAction::VoidItems, None, &cashier, "no authority");
        let err = g
            .approve(token, &Credential::pin("1234"), &identities)
            .unwrap_err();
        assert!(err.to_string().contains("second operator"));
    }

    #[test]
    fn underpowered_approver_denied() {
        let g = gate();
        let cashier = operator("cashier-1", Role::Cashier);
        let mut identities = InMemoryIdentities::new();
        identities.register("5678", operator("cashier-2", Role::Cashier));

        let token = g.request_approval(SensitiveAction::VoidItems, None, &cashier, "no authority");
        assert!(g
            .approve(token, &Credential::pin("5678"), &identities)
            .is_err());
    }

    #[test]
    fn manager_approving_beyond_their_own_ceiling_denied() {
        let g = gate();
        let cashier = operator("cashier-1", Role::Cashier);
        let mut identities = InMemoryIdentities::new();
        identities.register("1234", operator("mgr-1", Role::Manager));

        // 60% is beyond even the manager ceiling - approval must fail
        let token = g.request_approval(
            SensitiveAction::ApplyDiscount,
            Some(GateValue::Percent(60.0)),
            &cashier,
            "exceeds role limit",
        );
        assert!(g
            .approve(token, &Credential::pin("1234"), &identities)
            .is_err());
    }
}
