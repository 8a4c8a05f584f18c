//! Completion report - the terminal sessions the operator starts next
//!
//! Provisioning ends with instructions, not processes: the agent, the
//! simulator, the ground station, and the ROS 2 workspace each run in
//! their own terminal.

use crate::catalog::bridge::AGENT_UDP_PORT;
use crate::core::EnvContext;

/// One named terminal session with its commands in execution order
#[derive(Debug, Clone)]
pub struct Session {
    pub name: String,
    pub commands: Vec<String>,
}

/// The follow-up sessions, in the order the operator should start them
pub fn followup_sessions(ctx: &EnvContext) -> Vec<Session> {
    vec![
        Session {
            name: "bridge agent".to_string(),
            commands: vec![format!("MicroXRCEAgent udp4 -p {}", AGENT_UDP_PORT)],
        },
        Session {
            name: "simulator".to_string(),
            commands: vec![
                format!("cd {}", ctx.px4_root().display()),
                "make px4_sitl gz_x500".to_string(),
            ],
        },
        Session {
            name: "ground station".to_string(),
            commands: vec![ctx.qgc_path().display().to_string()],
        },
        Session {
            name: "workspace".to_string(),
            commands: vec![
                format!("cd {}", ctx.workspace_root.display()),
                "source install/setup.bash".to_string(),
                "ros2 launch px4_ros_com sensor_combined_listener.launch.py".to_string(),
            ],
        },
    ]
}
