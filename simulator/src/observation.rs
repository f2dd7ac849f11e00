//! Description of a single exposure of one target

use std::time::Duration;

use crate::photometry::{Filter, SkyModel, Target};

/// Everything the telescope needs to know about one exposure.
///
/// Catalog targets carry their own filter. Blackbody targets need an
/// explicit filter, and may be observed through a sky model.
///
/// # Examples
///
/// ```rust,no_run
/// # use exposure_sim::photometry::{Filter, SkyModel, Target};
/// # use exposure_sim::Observation;
/// # use std::time::Duration;
/// # fn demo(target: &Target, filter: &Filter, sky: &SkyModel) {
/// let observation = Observation::new(target, Duration::from_secs(45))
///     .with_filter(filter)
///     .with_sky(sky);
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    target: &'a Target,
    filter: Option<&'a Filter>,
    sky: Option<&'a SkyModel>,
    exposure: Duration,
}

impl<'a> Observation<'a> {
    /// Observe `target` for `exposure` with no extra filter or sky model
    pub fn new(target: &'a Target, exposure: Duration) -> Self {
        Self {
            target,
            filter: None,
            sky: None,
            exposure,
        }
    }

    /// Observe through `filter`
    pub fn with_filter(mut self, filter: &'a Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Attenuate by atmospheric transmission
    pub fn with_sky(mut self, sky: &'a SkyModel) -> Self {
        self.sky = Some(sky);
        self
    }

    pub fn target(&self) -> &'a Target {
        self.target
    }

    pub fn filter(&self) -> Option<&'a Filter> {
        self.filter
    }

    pub fn sky(&self) -> Option<&'a SkyModel> {
        self.sky
    }

    pub fn exposure(&self) -> Duration {
        self.exposure
    }

    /// Same observation with a different exposure duration
    pub fn with_exposure(mut self, exposure: Duration) -> Self {
        self.exposure = exposure;
        self
    }
}
