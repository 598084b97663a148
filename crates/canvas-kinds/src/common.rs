//! Actions shared by several kinds

use canvas_artifact::{ActionDescriptor, Icon, Notification, VersionChange};

/// Step back through version history; disabled on the first version
pub(crate) fn view_previous() -> ActionDescriptor {
    ActionDescriptor::new(Icon::Undo, "View Previous version", |ctx| {
        ctx.handle_version_change(VersionChange::Prev);
        Ok(())
    })
    .disabled_when(|ctx| ctx.current_version_index() == 0)
}

/// Step forward; disabled exactly when already on the latest version
pub(crate) fn view_next() -> ActionDescriptor {
    ActionDescriptor::new(Icon::Redo, "View Next version", |ctx| {
        ctx.handle_version_change(VersionChange::Next);
        Ok(())
    })
    .disabled_when(|ctx| ctx.is_current_version())
}

/// Copy raw content to the clipboard
pub(crate) fn copy_content(description: &'static str, success: &'static str) -> ActionDescriptor {
    ActionDescriptor::new(Icon::Copy, description, move |ctx| {
        ctx.platform().write_clipboard(ctx.content())?;
        ctx.notify(Notification::success(success));
        Ok(())
    })
    .with_label("Copy")
}
