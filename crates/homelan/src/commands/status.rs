//! `info` and `test`: capability reporting.

use homelan_mdns::Discovery;
use homelan_wol::NetworkInfo;
use serde::Serialize;

const SELF_TEST_MESSAGE: &str = "Network bridge is working";

#[derive(Debug, Serialize)]
pub struct InfoBody {
    #[serde(flatten)]
    pub network: NetworkInfo,
    pub mdns_available: bool,
    pub wol_available: bool,
}

#[derive(Debug, Serialize)]
pub struct TestBody {
    pub message: &'static str,
    pub version: &'static str,
    pub mdns_available: bool,
    pub wol_available: bool,
}

/// Magic packets only need a UDP socket, which every supported host has.
const WOL_AVAILABLE: bool = true;

pub fn info() -> InfoBody {
    InfoBody {
        network: homelan_wol::network_info(),
        mdns_available: Discovery::new().probe(),
        wol_available: WOL_AVAILABLE,
    }
}

pub fn self_test() -> TestBody {
    TestBody {
        message: SELF_TEST_MESSAGE,
        version: env!("CARGO_PKG_VERSION"),
        mdns_available: Discovery::new().probe(),
        wol_available: WOL_AVAILABLE,
    }
}
