pub mod dial;
pub mod email;
pub mod phone;

pub use dial::{normalize_dial_code, DialCodeSource, DialPicker};
pub use email::{is_valid_email, MAX_EMAIL_LEN};
pub use phone::{
    check_phone, classify, national_number, DialPlan, NumberCategory, PhoneCheck, NSN_LEN,
};
