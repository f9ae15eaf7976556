//! Tells users why their command failed.
//!
//! Without this extension, command errors are only logged.
//! See [handle_framework_error](crate::log::handle_framework_error).

use super::Extensions;
use crate::error::ExtensionError;

pub(super) fn load(extensions: &mut Extensions) -> Result<(), ExtensionError> {
    extensions.enable_command_error_replies();
    Ok(())
}
