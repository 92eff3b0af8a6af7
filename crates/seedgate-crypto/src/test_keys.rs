//! PEM fixtures shared by unit tests.

pub const SIGNER_PRIVATE_PEM: &[u8] = include_bytes!("../tests/fixtures/signer_private.pem");
pub const SIGNER_PRIVATE_PKCS1_PEM: &[u8] =
    include_bytes!("../tests/fixtures/signer_private_pkcs1.pem");
pub const SIGNER_PUBLIC_PEM: &[u8] = include_bytes!("../tests/fixtures/signer_public.pem");
pub const SIGNER_PUBLIC_PKCS1_PEM: &[u8] =
    include_bytes!("../tests/fixtures/signer_public_pkcs1.pem");
pub const RECIPIENT_PRIVATE_PEM: &[u8] = include_bytes!("../tests/fixtures/recipient_private.pem");
pub const RECIPIENT_PUBLIC_PEM: &[u8] = include_bytes!("../tests/fixtures/recipient_public.pem");

pub fn signer() -> crate::keys::PrivateKey {
    crate::keys::private_key_from_pem(SIGNER_PRIVATE_PEM).unwrap()
}

pub fn recipient() -> crate::keys::PrivateKey {
    crate::keys::private_key_from_pem(RECIPIENT_PRIVATE_PEM).unwrap()
}
