use nix::unistd::{Uid, User};

use super::UserResolver;
use crate::prelude::*;

/// Resolves uids through the system passwd database
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemUsers;

impl UserResolver for SystemUsers {
    fn user_name(&self, uid: u32) -> Option<String> {
        match User::from_uid(Uid::from_raw(uid)) {
            Ok(user) => user.map(|user| user.name),
            Err(e) => {
                debug!("Failed to look up user for uid {uid}: {e}");
                None
            }
        }
    }
}
