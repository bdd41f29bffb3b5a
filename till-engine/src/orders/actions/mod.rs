//! Command action implementations
//!
//! Each action implements the `CommandHandler` trait and handles one
//! specific command type.

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{OrderCommand, OrderCommandPayload, OrderEvent, OrderSnapshot, OrderStatus};

mod add_items;
mod add_payment;
mod apply_item_discount;
mod apply_order_discount;
mod assign_seat;
mod cancel_payment;
mod complete_order;
mod modify_item;
pub mod open_order;
mod override_price;
mod set_tip;
mod update_order_info;
mod void_item;
mod void_order;

pub use add_items::AddItemsAction;
pub(crate) use add_items::stock_key;
pub use add_payment::AddPaymentAction;
pub use apply_item_discount::ApplyItemDiscountAction;
pub use apply_order_discount::{ApplyOrderDiscountAction, ClearOrderDiscountAction};
pub use assign_seat::AssignSeatAction;
pub use cancel_payment::CancelPaymentAction;
pub use complete_order::CompleteOrderAction;
pub use modify_item::ModifyItemAction;
pub use open_order::OpenOrderAction;
pub use override_price::OverridePriceAction;
pub use set_tip::SetTipAction;
pub use update_order_info::UpdateOrderInfoAction;
pub use void_item::VoidItemAction;
pub use void_order::VoidOrderAction;

/// Validate that the order is still active.
///
/// Acting on a completed or voided order is a caller bug; the specific
/// error keeps it loud.
pub(super) fn validate_active_order(
    snapshot: &OrderSnapshot,
    order_id: &str,
) -> Result<(), OrderError> {
    match snapshot.status {
        OrderStatus::Active => Ok(()),
        OrderStatus::Completed => Err(OrderError::OrderAlreadyCompleted(order_id.to_string())),
        OrderStatus::Void => Err(OrderError::OrderAlreadyVoided(order_id.to_string())),
    }
}

/// CommandAction enum - dispatches to concrete action implementations
pub enum CommandAction {
    OpenOrder(OpenOrderAction),
    AddItems(AddItemsAction),
    ModifyItem(ModifyItemAction),
    VoidItem(VoidItemAction),
    ApplyItemDiscount(ApplyItemDiscountAction),
    OverridePrice(OverridePriceAction),
    ApplyOrderDiscount(ApplyOrderDiscountAction),
    ClearOrderDiscount(ClearOrderDiscountAction),
    SetTip(SetTipAction),
    AssignSeat(AssignSeatAction),
    UpdateOrderInfo(UpdateOrderInfoAction),
    AddPayment(AddPaymentAction),
    CancelPayment(CancelPaymentAction),
    CompleteOrder(CompleteOrderAction),
    VoidOrder(VoidOrderAction),
}

impl CommandHandler for CommandAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        match self {
            CommandAction::OpenOrder(action) => action.execute(ctx, metadata),
            CommandAction::AddItems(action) => action.execute(ctx, metadata),
            CommandAction::ModifyItem(action) => action.execute(ctx, metadata),
            CommandAction::VoidItem(action) => action.execute(ctx, metadata),
            CommandAction::ApplyItemDiscount(action) => action.execute(ctx, metadata),
            CommandAction::OverridePrice(action) => action.execute(ctx, metadata),
            CommandAction::ApplyOrderDiscount(action) => action.execute(ctx, metadata),
            CommandAction::ClearOrderDiscount(action) => action.execute(ctx, metadata),
            CommandAction::SetTip(action) => action.execute(ctx, metadata),
            CommandAction::AssignSeat(action) => action.execute(ctx, metadata),
            CommandAction::UpdateOrderInfo(action) => action.execute(ctx, metadata),
            CommandAction::AddPayment(action) => action.execute(ctx, metadata),
            CommandAction::CancelPayment(action) => action.execute(ctx, metadata),
            CommandAction::CompleteOrder(action) => action.execute(ctx, metadata),
            CommandAction::VoidOrder(action) => action.execute(ctx, metadata),
        }
    }
}

/// Convert OrderCommand to CommandAction
///
/// This is the ONLY place with a match on OrderCommandPayload. Fields
/// the engine injects (stock levels, gift card balances, approved
/// authorizers) start empty here; the OrdersManager fills them before
/// execution.
impl From<&OrderCommand> for CommandAction {
    fn from(cmd: &OrderCommand) -> Self {
        match &cmd.payload {
            OrderCommandPayload::OpenOrder { .. } => {
                // OpenOrder is handled by OrdersManager to generate the
                // order_id and receipt_number. This path is never taken.
                unreachable!("OpenOrder is handled by OrdersManager, not From<&OrderCommand>")
            }
            OrderCommandPayload::AddItems { order_id, items } => {
                CommandAction::AddItems(AddItemsAction {
                    order_id: order_id.clone(),
                    items: items.clone(),
                    stock: std::collections::HashMap::new(), // Injected by OrdersManager
                })
            }
            OrderCommandPayload::ModifyItem {
                order_id,
                instance_id,
                changes,
            } => CommandAction::ModifyItem(ModifyItemAction {
                order_id: order_id.clone(),
                instance_id: instance_id.clone(),
                changes: changes.clone(),
                available_stock: None, // Injected by OrdersManager
            }),
            OrderCommandPayload::VoidItem {
                order_id,
                instance_id,
                quantity,
                reason,
                authorizer_id,
                authorizer_name,
            } => CommandAction::VoidItem(VoidItemAction {
                order_id: order_id.clone(),
                instance_id: instance_id.clone(),
                quantity: *quantity,
                reason: reason.clone(),
                authorizer_id: authorizer_id.clone(),
                authorizer_name: authorizer_name.clone(),
            }),
            OrderCommandPayload::ApplyItemDiscount {
                order_id,
                instance_id,
                discount,
                authorizer_id,
                authorizer_name,
            } => CommandAction::ApplyItemDiscount(ApplyItemDiscountAction {
                order_id: order_id.clone(),
                instance_id: instance_id.clone(),
                discount: discount.clone(),
                authorizer_id: authorizer_id.clone(),
                authorizer_name: authorizer_name.clone(),
            }),
            OrderCommandPayload::OverridePrice {
                order_id,
                instance_id,
                new_price,
                reason,
                authorizer_id,
                authorizer_name,
            } => CommandAction::OverridePrice(OverridePriceAction {
                order_id: order_id.clone(),
                instance_id: instance_id.clone(),
                new_price: *new_price,
                reason: reason.clone(),
                authorizer_id: authorizer_id.clone(),
                authorizer_name: authorizer_name.clone(),
            }),
            OrderCommandPayload::ApplyOrderDiscount {
                order_id,
                discount,
                authorizer_id,
                authorizer_name,
            } => CommandAction::ApplyOrderDiscount(ApplyOrderDiscountAction {
                order_id: order_id.clone(),
                discount: discount.clone(),
                authorizer_id: authorizer_id.clone(),
                authorizer_name: authorizer_name.clone(),
            }),
            OrderCommandPayload::ClearOrderDiscount { order_id } => {
                CommandAction::ClearOrderDiscount(ClearOrderDiscountAction {
                    order_id: order_id.clone(),
                })
            }
            OrderCommandPayload::SetTip { order_id, tip } => CommandAction::SetTip(SetTipAction {
                order_id: order_id.clone(),
                tip: *tip,
            }),
            OrderCommandPayload::AssignSeat {
                order_id,
                instance_id,
                seat_number,
            } => CommandAction::AssignSeat(AssignSeatAction {
                order_id: order_id.clone(),
                instance_id: instance_id.clone(),
                seat_number: *seat_number,
            }),
            OrderCommandPayload::UpdateOrderInfo {
                order_id,
                order_type,
                guest_count,
                table_name,
                customer,
                note,
            } => CommandAction::UpdateOrderInfo(UpdateOrderInfoAction {
                order_id: order_id.clone(),
                order_type: *order_type,
                guest_count: *guest_count,
                table_name: table_name.clone(),
                customer: customer.clone(),
                note: note.clone(),
            }),
            OrderCommandPayload::AddPayment { order_id, payment } => {
                CommandAction::AddPayment(AddPaymentAction {
                    order_id: order_id.clone(),
                    payment: payment.clone(),
                    gift_card_balance: None, // Injected by OrdersManager
                })
            }
            OrderCommandPayload::CancelPayment {
                order_id,
                payment_id,
                reason,
                authorizer_id,
                authorizer_name,
            } => CommandAction::CancelPayment(CancelPaymentAction {
                order_id: order_id.clone(),
                payment_id: payment_id.clone(),
                reason: reason.clone(),
                authorizer_id: authorizer_id.clone(),
                authorizer_name: authorizer_name.clone(),
            }),
            OrderCommandPayload::CompleteOrder { order_id } => {
                CommandAction::CompleteOrder(CompleteOrderAction {
                    order_id: order_id.clone(),
                    gift_card_balances: std::collections::HashMap::new(), // Injected by OrdersManager
                })
            }
            OrderCommandPayload::VoidOrder {
                order_id,
                reason,
                authorizer_id,
                authorizer_name,
            } => CommandAction::VoidOrder(VoidOrderAction {
                order_id: order_id.clone(),
                reason: reason.clone(),
                authorizer_id: authorizer_id.clone(),
                authorizer_name: authorizer_name.clone(),
            }),
        }
    }
}
