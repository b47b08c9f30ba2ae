/// Mount/unmount contract between the screen and whatever displays it.

use crate::domain::snapshot::GameSnapshot;

/// Identifier of the screen itself within the navigation host.
pub const MAIN_ID: &str = "Main";
/// Fixed identifier the terminal results page is registered under.
pub const FINAL_ID: &str = "Final";

pub trait DisplaySurface {
    fn mount(&mut self, snapshot: &GameSnapshot);
    fn unmount(&mut self);
}

/// Host that owns top-level pages and decides which one is visible.
pub trait NavigationHost {
    /// Page type the host stores. Built fresh from the final snapshot.
    type Page: DisplaySurface + for<'a> From<&'a GameSnapshot>;

    fn mount(&mut self, id: &'static str, page: Self::Page);
    fn show(&mut self, id: &'static str);
}
