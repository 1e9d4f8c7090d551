// Purpose: The two execution contexts and the queue between them
// The controller runs on the input side, the audio engine inside the output callback

pub mod audio;
pub mod controller;
pub mod queue;

pub use audio::{AudioEngine, EngineStats};
pub use controller::Controller;
pub use queue::{event_queue, EventReceiver, EventSender};

use crate::{
    config::{ControllerConfig, EngineConfig},
    error::Error,
};

/// Build both contexts joined by a queue of `engine.queue_capacity` packets.
///
/// The controller stays with the input loop; the audio engine is meant to be
/// moved into the audio callback.
pub fn build(engine: &EngineConfig, controller: &ControllerConfig) -> Result<(Controller, AudioEngine), Error> {
    engine.validate()?;
    let (tx, rx) = event_queue(engine.queue_capacity);
    Ok((Controller::new(controller, tx)?, AudioEngine::new(engine, rx)?))
}
