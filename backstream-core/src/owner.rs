// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Groups listener registrations so they can be removed together.
///
/// Each call to [`OwnerToken::new`] yields a process-unique token. A consumer
/// typically creates one token for its whole lifetime and passes it to every
/// `listen` call, then hands it to
/// [`BackedStream::remove_owner`](crate::BackedStream::remove_owner) on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerToken(u64);

impl OwnerToken {
    #[must_use]
    pub fn new() -> Self {
        Self(NEXT_OWNER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for OwnerToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies one listener registered on a backed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Handle returned by `listen`.
///
/// Dropping it does not unregister anything; pass it to
/// [`BackedStream::unlisten`](crate::BackedStream::unlisten) or tear down the
/// whole owner instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub(crate) id: ListenerId,
    pub(crate) owner: OwnerToken,
}

impl Subscription {
    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }

    #[must_use]
    pub const fn owner(&self) -> OwnerToken {
        self.owner
    }
}
