// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - external collaborators (identity, object storage).

pub mod identity;
pub mod storage;
pub mod token_verifier;

pub use identity::{FirebaseIdentity, IdentityError, IdentityProvider, SignedInUser, VerifiedUser};
pub use storage::ObjectStorage;
pub use token_verifier::FirebaseTokenVerifier;
