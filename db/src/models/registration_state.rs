use crate::models::enums::{PaymentStatus, RegistrationStatus};
use crate::utils::errors::EnumParseError;

/// How a registration's payment was (or will be) settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settlement {
    Free,
    Paid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelReason {
    PaymentFailed,
    Refunded,
}

/// The registration lifecycle as one tagged type. The `status` and
/// `payment_status` columns are projections of this; every legal column
/// combination maps to exactly one variant, so an illegal combination cannot
/// be represented once parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationState {
    PendingPayment,
    Confirmed(Settlement),
    Cancelled(CancelReason),
    CheckedIn(Settlement),
}

/// Result of applying a payment outcome to the current state. A duplicate or
/// late callback lands on `AlreadySettled` and must change nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleAttempt {
    Apply(RegistrationState),
    AlreadySettled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckInBlock {
    AlreadyCheckedIn,
    PaymentPending,
    Cancelled,
}

impl RegistrationState {
    /// State for a brand new registration: free tickets confirm immediately,
    /// priced tickets wait for the payment flow.
    pub fn initial(price: i64) -> RegistrationState {
        if price == 0 {
            RegistrationState::Confirmed(Settlement::Free)
        } else {
            RegistrationState::PendingPayment
        }
    }

    pub fn from_columns(status: &str, payment_status: &str) -> Result<RegistrationState, EnumParseError> {
        let status = RegistrationStatus::parse(status)?;
        let payment_status = PaymentStatus::parse(payment_status)?;
        let invalid = |message: &str| EnumParseError {
            message: message.to_string(),
            enum_type: "RegistrationState".to_string(),
            value: format!("{}/{}", status, payment_status),
        };

        match (status, payment_status) {
            (RegistrationStatus::Pending, PaymentStatus::Pending) => Ok(RegistrationState::PendingPayment),
            (RegistrationStatus::Confirmed, PaymentStatus::Free) => {
                Ok(RegistrationState::Confirmed(Settlement::Free))
            }
            (RegistrationStatus::Confirmed, PaymentStatus::Paid) => {
                Ok(RegistrationState::Confirmed(Settlement::Paid))
            }
            (RegistrationStatus::Cancelled, PaymentStatus::Failed) => {
                Ok(RegistrationState::Cancelled(CancelReason::PaymentFailed))
            }
            (RegistrationStatus::Cancelled, PaymentStatus::Refunded) => {
                Ok(RegistrationState::Cancelled(CancelReason::Refunded))
            }
            (RegistrationStatus::CheckedIn, PaymentStatus::Free) => {
                Ok(RegistrationState::CheckedIn(Settlement::Free))
            }
            (RegistrationStatus::CheckedIn, PaymentStatus::Paid) => {
                Ok(RegistrationState::CheckedIn(Settlement::Paid))
            }
            _ => Err(invalid("Status columns do not form a valid registration state")),
        }
    }

    pub fn columns(&self) -> (RegistrationStatus, PaymentStatus) {
        match self {
            RegistrationState::PendingPayment => (RegistrationStatus::Pending, PaymentStatus::Pending),
            RegistrationState::Confirmed(Settlement::Free) => {
                (RegistrationStatus::Confirmed, PaymentStatus::Free)
            }
            RegistrationState::Confirmed(Settlement::Paid) => {
                (RegistrationStatus::Confirmed, PaymentStatus::Paid)
            }
            RegistrationState::Cancelled(CancelReason::PaymentFailed) => {
                (RegistrationStatus::Cancelled, PaymentStatus::Failed)
            }
            RegistrationState::Cancelled(CancelReason::Refunded) => {
                (RegistrationStatus::Cancelled, PaymentStatus::Refunded)
            }
            RegistrationState::CheckedIn(Settlement::Free) => {
                (RegistrationStatus::CheckedIn, PaymentStatus::Free)
            }
            RegistrationState::CheckedIn(Settlement::Paid) => {
                (RegistrationStatus::CheckedIn, PaymentStatus::Paid)
            }
        }
    }

    /// A successful payment callback. Only a pending registration moves; any
    /// other state has already been settled one way or another.
    pub fn settle_paid(&self) -> SettleAttempt {
        match self {
            RegistrationState::PendingPayment => {
                SettleAttempt::Apply(RegistrationState::Confirmed(Settlement::Paid))
            }
            _ => SettleAttempt::AlreadySettled,
        }
    }

    /// A failed payment callback or a synchronous initiation rejection.
    pub fn settle_failed(&self) -> SettleAttempt {
        match self {
            RegistrationState::PendingPayment => {
                SettleAttempt::Apply(RegistrationState::Cancelled(CancelReason::PaymentFailed))
            }
            _ => SettleAttempt::AlreadySettled,
        }
    }

    pub fn check_in(&self) -> Result<RegistrationState, CheckInBlock> {
        match self {
            RegistrationState::Confirmed(settlement) => Ok(RegistrationState::CheckedIn(*settlement)),
            RegistrationState::CheckedIn(_) => Err(CheckInBlock::AlreadyCheckedIn),
            RegistrationState::PendingPayment => Err(CheckInBlock::PaymentPending),
            RegistrationState::Cancelled(_) => Err(CheckInBlock::Cancelled),
        }
    }
}
