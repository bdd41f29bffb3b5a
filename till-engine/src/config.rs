//! Engine configuration
//!
//! # Environment variables
//!
//! Every knob can be overridden through environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | TAX_RATE | 0.0 | Flat tax rate applied to the discounted subtotal (e.g. 0.08) |
//! | SETTLE_TOLERANCE | 0.01 | Epsilon for "order is fully paid" comparisons |
//!
//! Role policies and the discount-reason taxonomy are configured in code
//! by the host application; the defaults below match the standard
//! cashier/manager/admin setup.

use shared::models::Role;
use std::collections::HashMap;

/// Discount ceiling for one role. `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountCeiling {
    /// Maximum percentage discount (0-100)
    pub max_percent: Option<f64>,
    /// Maximum fixed discount / price-override markdown amount
    pub max_amount: Option<f64>,
}

impl DiscountCeiling {
    pub const UNLIMITED: DiscountCeiling = DiscountCeiling {
        max_percent: None,
        max_amount: None,
    };

    pub fn new(max_percent: f64, max_amount: f64) -> Self {
        Self {
            max_percent: Some(max_percent),
            max_amount: Some(max_amount),
        }
    }
}

/// What a role may do without a second credential
#[derive(Debug, Clone, PartialEq)]
pub struct RolePolicy {
    /// May void line items / orders directly
    pub can_void: bool,
    /// May override prices directly (within the ceiling)
    pub can_override_price: bool,
    /// Ceiling for discounts and override markdowns
    pub discount_ceiling: DiscountCeiling,
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Flat tax rate applied to the discounted subtotal (e.g. 0.08 = 8%).
    /// Snapshotted into each order at open.
    pub tax_rate: f64,
    /// Epsilon for settlement comparisons (absorbs floating rounding)
    pub settle_tolerance: f64,
    /// Per-role sensitive-action policy
    pub role_policies: HashMap<Role, RolePolicy>,
    /// Discount-reason taxonomy. A reason outside the list is accepted
    /// as free text only when the list contains "Other".
    pub discount_reasons: Vec<String>,
}

impl EngineConfig {
    /// Load configuration from environment variables, using defaults
    /// for anything unset
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(rate) = std::env::var("TAX_RATE").ok().and_then(|v| v.parse().ok()) {
            config.tax_rate = rate;
        }
        if let Some(tol) = std::env::var("SETTLE_TOLERANCE")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.settle_tolerance = tol;
        }
        config
    }

    /// Policy for a role; roles without an explicit policy get the most
    /// restrictive one (nothing direct, zero ceiling)
    pub fn policy(&self, role: Role) -> RolePolicy {
        self.role_policies.get(&role).cloned().unwrap_or(RolePolicy {
            can_void: false,
            can_override_price: false,
            discount_ceiling: DiscountCeiling::new(0.0, 0.0),
        })
    }

    /// Whether a discount reason is acceptable under the taxonomy
    pub fn is_valid_discount_reason(&self, reason: &str) -> bool {
        if reason.trim().is_empty() {
            return false;
        }
        self.discount_reasons.iter().any(|r| r == reason)
            || self.discount_reasons.iter().any(|r| r == "Other")
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut role_policies = HashMap::new();
        role_policies.insert(
            Role::Cashier,
            RolePolicy {
                can_void: false,
                can_override_price: false,
                discount_ceiling: DiscountCeiling::new(10.0, 20.0),
            },
        );
        role_policies.insert(
            Role::Manager,
            RolePolicy {
                can_void: true,
                can_override_price: true,
                discount_ceiling: DiscountCeiling::new(50.0, 500.0),
            },
        );
        role_policies.insert(
            Role::Admin,
            RolePolicy {
                can_void: true,
                can_override_price: true,
                discount_ceiling: DiscountCeiling::UNLIMITED,
            },
        );

        Self {
            tax_rate: 0.0,
            settle_tolerance: 0.01,
            role_policies,
            discount_reasons: vec![
                "Employee Discount".to_string(),
                "Manager Discretion".to_string(),
                "Customer Loyalty".to_string(),
                "Damaged Item".to_string(),
                "Price Match".to_string(),
                "Promotional".to_string(),
                "Clearance".to_string(),
                "Bulk Discount".to_string(),
                "VIP Customer".to_string(),
                "Complaint Resolution".to_string(),
                "Senior Discount".to_string(),
                "Student Discount".to_string(),
                "Military Discount".to_string(),
                "Other".to_string(),
            ],
        }
    }
}
