use serde_json::Value;

/// The three outcomes this platform recognizes in a payment callback. Moolre
/// has been observed spelling the same result several ways ("success",
/// "completed", numeric 1, ...), so every callback status is collapsed here,
/// in one place, before any business state is touched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success,
    Failure,
    /// Not a recognized success or failure signal. Callers must leave the
    /// payment pending rather than guess.
    Indeterminate,
}

impl PaymentOutcome {
    pub fn from_raw(raw: Option<&Value>) -> PaymentOutcome {
        match raw {
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "success" | "completed" | "1" => PaymentOutcome::Success,
                "failed" | "declined" | "0" => PaymentOutcome::Failure,
                _ => PaymentOutcome::Indeterminate,
            },
            Some(Value::Number(n)) => match n.as_i64() {
                Some(1) => PaymentOutcome::Success,
                Some(0) => PaymentOutcome::Failure,
                _ => PaymentOutcome::Indeterminate,
            },
            _ => PaymentOutcome::Indeterminate,
        }
    }
}
