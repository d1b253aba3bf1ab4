use std::sync::Arc;

use rtrb::Producer;

use crate::{
    io::RenderSink,
    synth::{
        message::{EventSender, VoiceEvent},
        mixer::Mixer,
        pool::VoicePool,
    },
};

/// The realtime half of the engine, owned by the driver's callback.
///
/// Per callback: zero the buffer, let every playing voice add itself, run
/// the master bus. Nothing here locks the allocation mutex, allocates, or
/// logs.
pub struct Renderer {
    pool: Arc<VoicePool>,
    mixer: Mixer,
    events: Producer<VoiceEvent>,
    scope: Option<Producer<f32>>,
}

impl Renderer {
    pub fn new(
        pool: Arc<VoicePool>,
        mixer: Mixer,
        events: Producer<VoiceEvent>,
        scope: Option<Producer<f32>>,
    ) -> Self {
        Self {
            pool,
            mixer,
            events,
            scope,
        }
    }

    /// Fill `buffer` (interleaved, `channels` wide) with the next block.
    pub fn render_block(&mut self, buffer: &mut [f32], channels: usize) {
        buffer.fill(0.0);
        if channels == 0 {
            return;
        }

        let Self {
            pool,
            mixer,
            events,
            scope,
        } = self;

        pool.render(buffer, channels, |event| events.send(event));
        mixer.process(buffer);

        if let Some(scope) = scope {
            for frame in buffer.chunks_exact(channels) {
                if scope.push(frame[0]).is_err() {
                    break;
                }
            }
        }
    }
}

impl RenderSink for Renderer {
    fn render(&mut self, buffer: &mut [f32], channels: usize) {
        self.render_block(buffer, channels);
    }
}
