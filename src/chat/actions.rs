//! Quick-action buttons.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A canned prompt offered as a button above the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Search,
    Status,
    Order,
    Cancel,
    ListOrders,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown quick action: {0}")]
pub struct UnknownAction(pub String);

impl QuickAction {
    /// Buttons in display order.
    pub const ALL: [QuickAction; 5] = [
        QuickAction::Search,
        QuickAction::Status,
        QuickAction::Order,
        QuickAction::Cancel,
        QuickAction::ListOrders,
    ];

    /// Intent tag, as carried by the button.
    pub fn tag(self) -> &'static str {
        match self {
            QuickAction::Search => "search",
            QuickAction::Status => "status",
            QuickAction::Order => "order",
            QuickAction::Cancel => "cancel",
            QuickAction::ListOrders => "list_orders",
        }
    }

    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            QuickAction::Search => "Search",
            QuickAction::Status => "Order Status",
            QuickAction::Order => "Place Order",
            QuickAction::Cancel => "Cancel Order",
            QuickAction::ListOrders => "My Orders",
        }
    }

    /// Text placed in the input when the button is clicked.
    pub fn prompt(self) -> &'static str {
        match self {
            QuickAction::Search => "Search for: ",
            QuickAction::Status => "What is the status of order ",
            QuickAction::Order => "Order 1 of product ",
            QuickAction::Cancel => "Cancel order ",
            QuickAction::ListOrders => "List all my orders",
        }
    }

    /// `list_orders` is a complete message and is sent immediately.
    pub fn submits_immediately(self) -> bool {
        matches!(self, QuickAction::ListOrders)
    }

    /// Full message for this action with `argument` appended to the prompt.
    ///
    /// Complete actions ignore the argument.
    pub fn compose(self, argument: Option<&str>) -> String {
        match argument {
            Some(arg) if !self.submits_immediately() => format!("{}{}", self.prompt(), arg),
            _ => self.prompt().to_string(),
        }
    }
}

impl FromStr for QuickAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuickAction::ALL
            .into_iter()
            .find(|action| action.tag() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

impl fmt::Display for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        for action in QuickAction::ALL {
            assert_eq!(action.tag().parse::<QuickAction>(), Ok(action));
        }
        assert_eq!(
            "refund".parse::<QuickAction>(),
            Err(UnknownAction("refund".to_string()))
        );
    }

    #[test]
    fn test_prompts() {
        assert_eq!(QuickAction::Search.prompt(), "Search for: ");
        assert_eq!(QuickAction::Order.prompt(), "Order 1 of product ");
        assert_eq!(QuickAction::Cancel.prompt(), "Cancel order ");
    }

    #[test]
    fn test_only_list_orders_submits_immediately() {
        let immediate: Vec<_> = QuickAction::ALL
            .into_iter()
            .filter(|a| a.submits_immediately())
            .collect();
        assert_eq!(immediate, vec![QuickAction::ListOrders]);
    }

    #[test]
    fn test_compose() {
        assert_eq!(
            QuickAction::Status.compose(Some("12345")),
            "What is the status of order 12345"
        );
        assert_eq!(QuickAction::Cancel.compose(None), "Cancel order ");
        assert_eq!(
            QuickAction::ListOrders.compose(Some("ignored")),
            "List all my orders"
        );
    }
}
