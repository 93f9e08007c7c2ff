//! Test fixtures shared by the module tests.

use sitegraph_shared::BusinessProfile;

const PROFILE: &str = include_str!("../../../../fixtures/profile.toml");

/// The beelodev.com business profile.
pub fn profile() -> BusinessProfile {
    BusinessProfile::from_toml_str(PROFILE).expect("fixture profile parses")
}
