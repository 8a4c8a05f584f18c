//! Bridging agent step: the Micro XRCE-DDS Agent between PX4 and DDS

use crate::core::{Action, EnvContext, Probe, ProvisionConfig, Step};
use crate::runner::CommandSpec;

/// UDP port the agent listens on; PX4's uxrce_dds_client connects here
pub const AGENT_UDP_PORT: u16 = 8888;

/// Build and install the Micro XRCE-DDS Agent from source
pub fn xrce_agent(ctx: &EnvContext, config: &ProvisionConfig) -> Step {
    let dest = ctx.agent_root();

    Step::new(
        "micro-xrce-dds-agent",
        "build and install the Micro XRCE-DDS Agent",
        Probe::CommandOnPath("MicroXRCEAgent".to_string()),
        Action::Commands(vec![
            CommandSpec::new("git")
                .arg("clone")
                .arg(config.agent_remote.clone())
                .arg(dest.display().to_string()),
            CommandSpec::new("cmake")
                .args(["-S", ".", "-B", "build"])
                .current_dir(dest.clone()),
            CommandSpec::new("make")
                .args(["-C", "build"])
                .current_dir(dest.clone()),
            CommandSpec::shell(format!(
                "cd {}/build && sudo make install && sudo ldconfig /usr/local/lib/",
                dest.display()
            )),
        ]),
    )
}
