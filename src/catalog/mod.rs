//! Step catalog - the declarative provisioning plan
//!
//! Steps are assembled here, parameterized by the environment context and
//! the configuration, and handed to the driver as an ordered list. Tests
//! substitute individual steps or whole sub-catalogs without touching the
//! driver.

pub mod bridge;
pub mod report;
pub mod ros2;
pub mod simulator;
pub mod workspace;

use crate::core::{EnvContext, Plan, ProvisionConfig};

/// Build the full provisioning plan in execution order
pub fn provisioning_plan(ctx: &EnvContext, config: &ProvisionConfig) -> Plan {
    let mut steps = Vec::new();

    steps.extend(ros2::steps(ctx));
    steps.push(simulator::gazebo(ctx));
    steps.push(simulator::px4_autopilot(ctx, config));
    steps.push(bridge::xrce_agent(ctx, config));
    steps.push(simulator::qgroundcontrol(ctx, config));
    steps.extend(workspace::steps(ctx, config));

    Plan::new("px4-ros2-sitl", steps)
}
