//! Azure AD authentication module.
//!
//! Provides the OAuth2 client-credentials flow and zeroize-on-drop wrappers
//! for the secrets it handles.

pub mod oauth;
pub mod secure;
