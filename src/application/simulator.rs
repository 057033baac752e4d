//! Simulated network and user input driving a session manager
//!
//! Stands in for the signaling stack and the handset UI: each step looks at
//! what the phone is doing and fires one plausible command.

use crate::domain::session::manager::CallSessionManager;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Interval;
use tracing::{debug, info};

/// One externally triggered command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PhoneCommand {
    GenerateIncoming,
    GenerateOutgoing,
    Dial { number: String, name: String },
    Answer,
    Reject,
    SwitchCall,
    Terminate,
    Pickup { slot: u8 },
}

impl PhoneCommand {
    /// Apply the command to `manager`
    pub fn apply(&self, manager: &CallSessionManager) {
        match self {
            PhoneCommand::GenerateIncoming => manager.generate_incoming(),
            PhoneCommand::GenerateOutgoing => manager.generate_outgoing(),
            PhoneCommand::Dial { number, name } => manager.dial(number, name),
            PhoneCommand::Answer => manager.answer(),
            PhoneCommand::Reject => manager.reject(),
            PhoneCommand::SwitchCall => manager.switch_call(),
            PhoneCommand::Terminate => manager.terminate(),
            PhoneCommand::Pickup { slot } => manager.pickup(*slot),
        }
    }
}

/// Pick a command that makes sense for what the manager currently shows.
///
/// The pick is advisory like every command: the state may change before
/// the command lands, in which case the manager ignores it.
pub fn next_command<R: Rng>(manager: &CallSessionManager, rng: &mut R) -> PhoneCommand {
    let snapshot = manager.snapshot();

    if snapshot.first.is_none() {
        return match rng.gen_range(0..3) {
            0 => PhoneCommand::GenerateOutgoing,
            1 => PhoneCommand::Dial {
                number: format!("555-{:04}", rng.gen_range(0..10000)),
                name: "Manual".to_string(),
            },
            _ => PhoneCommand::GenerateIncoming,
        };
    }

    let dialing_slot = snapshot
        .calls()
        .find(|call| call.state().is_dialing())
        .map(|call| call.level().slot_number());
    let ringing = manager.incoming_call().is_some();

    let mut choices = vec![PhoneCommand::Terminate];
    if ringing {
        choices.push(PhoneCommand::Answer);
        choices.push(PhoneCommand::Answer);
        choices.push(PhoneCommand::Reject);
    }
    if let Some(slot) = dialing_slot {
        choices.push(PhoneCommand::Pickup { slot });
        choices.push(PhoneCommand::Pickup { slot });
    }
    if snapshot.is_busy() {
        choices.push(PhoneCommand::SwitchCall);
    } else {
        choices.push(PhoneCommand::GenerateIncoming);
        choices.push(PhoneCommand::GenerateOutgoing);
    }

    let pick = rng.gen_range(0..choices.len());
    choices.swap_remove(pick)
}

/// `tokio::time::interval` panics on a zero period
fn periodic(period: Duration) -> Interval {
    tokio::time::interval(period.max(Duration::from_millis(1)))
}

/// Fire `steps` simulated commands, one every `interval`
pub fn spawn_event_source(
    manager: Arc<CallSessionManager>,
    interval: Duration,
    steps: usize,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = periodic(interval);
        for step in 0..steps {
            ticker.tick().await;
            let command = next_command(&manager, &mut rand::thread_rng());
            debug!(step, ?command, "simulated event");
            command.apply(&manager);
        }
        info!("event source finished after {} steps", steps);
    })
}

/// Advance call timers once per second
pub fn spawn_clock(manager: Arc<CallSessionManager>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = periodic(Duration::from_secs(1));
        ticker.tick().await;
        loop {
            ticker.tick().await;
            manager.advance_clock(1);
        }
    })
}

/// Periodically render what a handset display would show
pub fn spawn_ui_poller(manager: Arc<CallSessionManager>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = periodic(interval);
        loop {
            ticker.tick().await;
            let snapshot = manager.snapshot();
            match serde_json::to_string(&snapshot) {
                Ok(json) => debug!(target: "softphone::ui", "{}", json),
                Err(e) => debug!(target: "softphone::ui", "snapshot not serializable: {}", e),
            }
            manager.print_info();
        }
    })
}
