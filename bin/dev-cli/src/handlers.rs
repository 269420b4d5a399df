pub(crate) mod address;
pub(crate) mod credential;
pub(crate) mod derive_keys;
pub(crate) mod proof;
