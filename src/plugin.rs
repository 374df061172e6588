use crate::app::App;
use crate::error::Result;

/// Plugin trait for modular application architecture
pub trait Plugin {
    fn plugin_name(&self) -> &'static str;

    /// Build the plugin into the app.
    ///
    /// Consumes the plugin so it can hand owned resources (a drawing
    /// surface, for instance) to the systems it registers.
    fn build(self, app: &mut App) -> Result<()>;
}
