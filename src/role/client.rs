use super::{RoleHelper, ClientRole};
use crate::frame::{Mask, mask::new_mask_key};

/// Standard client, every frame gets a fresh random mask key.
#[derive(Debug, Clone, Copy)]
pub struct Client;

impl RoleHelper for Client {
    #[inline]
    fn write_mask() -> Mask { Mask::Key(new_mask_key()) }
}

impl ClientRole for Client {}
