use crate::application::ports::security::CodeGenerator;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};

const CODE_BYTES: usize = 32;

/// 256 bits from the OS CSPRNG, base64url without padding.
#[derive(Default, Clone)]
pub struct OsRandomCodeGenerator;

impl CodeGenerator for OsRandomCodeGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; CODE_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}
