//! APF, the PUMI mesh libraries.

use crate::builder::toolchain::Language;
use crate::configure::checker::Checker;
use crate::configure::environment::BuildEnvironment;
use crate::configure::error::ProbeResult;
use crate::configure::probe::{probe, CapabilityDescriptor, LibrarySpec};

/// Coupling to SimModSuite.
const SIMMETRIX_LIBS: &[(&str, &str)] = &[("gmi_sim", "gmi_sim.h"), ("apf_sim", "apfSIM.h")];

/// Coupling to Zoltan.
const ZOLTAN_LIBS: &[(&str, &str)] = &[("apf_zoltan", "apfZoltan.h")];

const CORE_LIBS: &[(&str, &str)] = &[
    ("gmi", "gmi.h"),
    ("mds", "apfMDS.h"),
    ("ma", "ma.h"),
    ("apf", "apf.h"),
    ("pcu", "PCU.h"),
    ("lion", "lionCompress.h"),
    ("mth", "mth.h"),
];

/// APF probe options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Require the SimModSuite geometry and mesh adapters.
    pub simmetrix: bool,
    /// Require the Zoltan adapter.
    pub zoltan: bool,
}

/// What the APF probe checks for, in link order.
pub fn descriptor(options: &Options) -> CapabilityDescriptor {
    let mut libs: Vec<(&str, &str)> = Vec::new();
    if options.simmetrix {
        libs.extend_from_slice(SIMMETRIX_LIBS);
    }
    if options.zoltan {
        libs.extend_from_slice(ZOLTAN_LIBS);
    }
    libs.extend_from_slice(CORE_LIBS);

    libs.into_iter()
        .fold(CapabilityDescriptor::new("apf", Language::Cxx), |d, (lib, header)| {
            d.library(LibrarySpec::with_header(lib, header))
        })
}

/// Find APF and add its libraries to `env`.
pub fn find(
    env: &mut BuildEnvironment,
    checker: &mut dyn Checker,
    options: &Options,
    required: bool,
) -> ProbeResult {
    probe(env, checker, &descriptor(options), required)
}
