use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Booking, BookingStatus};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BookingAction {
    Confirm,
    Activate,
    Complete,
    Cancel,
}

impl BookingAction {
    pub const ALL: [BookingAction; 4] = [
        BookingAction::Confirm,
        BookingAction::Activate,
        BookingAction::Complete,
        BookingAction::Cancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingAction::Confirm => "confirm",
            BookingAction::Activate => "activate",
            BookingAction::Complete => "complete",
            BookingAction::Cancel => "cancel",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirm" => Some(BookingAction::Confirm),
            "activate" => Some(BookingAction::Activate),
            "complete" => Some(BookingAction::Complete),
            "cancel" => Some(BookingAction::Cancel),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("booking must be paid before it can be confirmed")]
    PaymentRequired,

    #[error("booking is already {0} and cannot change")]
    Terminal(BookingStatus),

    #[error("cannot {action} a booking that is {from}")]
    NotAllowed {
        from: BookingStatus,
        action: BookingAction,
    },
}

pub fn next_status(
    current: BookingStatus,
    action: BookingAction,
    payment_paid: bool,
) -> Result<BookingStatus, TransitionError> {
    if current.is_terminal() {
        return Err(TransitionError::Terminal(current));
    }

    match (current, action) {
        (BookingStatus::Pending, BookingAction::Confirm) if payment_paid => {
            Ok(BookingStatus::Confirmed)
        }
        (BookingStatus::Pending, BookingAction::Confirm) => Err(TransitionError::PaymentRequired),
        (BookingStatus::Confirmed, BookingAction::Activate) => Ok(BookingStatus::Active),
        (BookingStatus::Active, BookingAction::Complete) => Ok(BookingStatus::Completed),
        (BookingStatus::Pending | BookingStatus::Confirmed, BookingAction::Cancel) => {
            Ok(BookingStatus::Cancelled)
        }
        (from, action) => Err(TransitionError::NotAllowed { from, action }),
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    Renter,
    Owner,
}

impl Actor {
    pub fn of(booking: &Booking, user_id: Uuid) -> Option<Self> {
        if booking.owner_id == user_id {
            Some(Actor::Owner)
        } else if booking.user_id == user_id {
            Some(Actor::Renter)
        } else {
            None
        }
    }

    pub fn permits(&self, action: BookingAction) -> bool {
        match self {
            Actor::Owner => true,
            Actor::Renter => action == BookingAction::Cancel,
        }
    }
}

pub fn allowed_actions(booking: &Booking, actor: Actor) -> Vec<BookingAction> {
    BookingAction::ALL
        .into_iter()
        .filter(|a| actor.permits(*a))
        .filter(|a| next_status(booking.status, *a, booking.is_paid()).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::fixtures::booking;
    use crate::models::PaymentStatus;

    const STATUSES: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Active,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    fn rank(s: BookingStatus) -> u8 {
        match s {
            BookingStatus::Pending => 0,
            BookingStatus::Confirmed => 1,
            BookingStatus::Active => 2,
            BookingStatus::Completed => 3,
            BookingStatus::Cancelled => 4,
        }
    }

    #[test]
    fn test_happy_path() {
        let s = next_status(BookingStatus::Pending, BookingAction::Confirm, true).unwrap();
        assert_eq!(s, BookingStatus::Confirmed);
        let s = next_status(s, BookingAction::Activate, true).unwrap();
        assert_eq!(s, BookingStatus::Active);
        let s = next_status(s, BookingAction::Complete, true).unwrap();
        assert_eq!(s, BookingStatus::Completed);
    }

    #[test]
    fn test_confirm_requires_payment() {
        assert_eq!(
            next_status(BookingStatus::Pending, BookingAction::Confirm, false),
            Err(TransitionError::PaymentRequired)
        );
    }

    #[test]
    fn test_confirm_only_from_pending() {
        for status in STATUSES {
            let result = next_status(status, BookingAction::Confirm, true);
            assert_eq!(result.is_ok(), status == BookingStatus::Pending, "{status:?}");
        }
    }

    #[test]
    fn test_cancel_only_before_activation() {
        for status in STATUSES {
            let result = next_status(status, BookingAction::Cancel, false);
            let expected = matches!(status, BookingStatus::Pending | BookingStatus::Confirmed);
            assert_eq!(result.is_ok(), expected, "{status:?}");
        }
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for status in [BookingStatus::Completed, BookingStatus::Cancelled] {
            for action in BookingAction::ALL {
                assert_eq!(
                    next_status(status, action, true),
                    Err(TransitionError::Terminal(status))
                );
            }
        }
    }

    #[test]
    fn test_transitions_only_move_forward() {
        for from in STATUSES {
            for action in BookingAction::ALL {
                for paid in [true, false] {
                    if let Ok(to) = next_status(from, action, paid) {
                        assert!(rank(to) > rank(from), "{from:?} -> {to:?}");
                        if to == BookingStatus::Cancelled {
                            assert!(rank(from) <= 1);
                        } else {
                            assert_eq!(rank(to), rank(from) + 1);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_skipping_steps_not_allowed() {
        let err = next_status(BookingStatus::Pending, BookingAction::Activate, true).unwrap_err();
        assert_eq!(
            err,
            TransitionError::NotAllowed {
                from: BookingStatus::Pending,
                action: BookingAction::Activate,
            }
        );
        assert_eq!(err.to_string(), "cannot activate a booking that is pending");
        assert!(next_status(BookingStatus::Confirmed, BookingAction::Complete, true).is_err());
    }

    #[test]
    fn test_actor_of_booking() {
        let b = booking(BookingStatus::Pending, PaymentStatus::Pending);
        assert_eq!(Actor::of(&b, b.owner_id), Some(Actor::Owner));
        assert_eq!(Actor::of(&b, b.user_id), Some(Actor::Renter));
        assert_eq!(Actor::of(&b, Uuid::new_v4()), None);
    }

    #[test]
    fn test_allowed_actions_owner() {
        let unpaid = booking(BookingStatus::Pending, PaymentStatus::Processing);
        assert_eq!(allowed_actions(&unpaid, Actor::Owner), vec![BookingAction::Cancel]);

        let paid = booking(BookingStatus::Pending, PaymentStatus::Paid);
        assert_eq!(
            allowed_actions(&paid, Actor::Owner),
            vec![BookingAction::Confirm, BookingAction::Cancel]
        );

        let active = booking(BookingStatus::Active, PaymentStatus::Paid);
        assert_eq!(allowed_actions(&active, Actor::Owner), vec![BookingAction::Complete]);
    }

    #[test]
    fn test_allowed_actions_renter_can_only_cancel() {
        let paid = booking(BookingStatus::Pending, PaymentStatus::Paid);
        assert_eq!(allowed_actions(&paid, Actor::Renter), vec![BookingAction::Cancel]);

        let active = booking(BookingStatus::Active, PaymentStatus::Paid);
        assert!(allowed_actions(&active, Actor::Renter).is_empty());
    }

    #[test]
    fn test_allowed_actions_agree_with_next_status() {
        for status in STATUSES {
            for payment in [PaymentStatus::Pending, PaymentStatus::Paid, PaymentStatus::Failed] {
                let b = booking(status, payment);
                for actor in [Actor::Owner, Actor::Renter] {
                    for action in allowed_actions(&b, actor) {
                        assert!(next_status(status, action, b.is_paid()).is_ok());
                    }
                }
            }
        }
    }
}
