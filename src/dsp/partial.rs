use std::f64::consts::TAU;

/*
Decaying Partial
================

A partial is one sine component of an additive tone. Struck instruments
(bells, marimba, steelpan) are well modelled by a handful of partials that
are each hit once and then ring down on their own.

Vocabulary
----------

  phase        Position in the sine cycle, radians, kept in [0, 2π).

  increment    How far the phase advances per sample:
                   increment = 2π · frequency / sample_rate

  amplitude    Current linear gain of the partial.

  decay        Per-sample multiplier applied to amplitude. A value just
               below 1.0 gives an exponential ring-down:
                   amplitude[n] = amplitude[0] · decay^n


Decay Factor to Time
--------------------

Samples until the amplitude falls by a factor k:

    n = ln(k) / ln(decay)

Example: decay = 0.99995, fall to 1/1000 (-60 dB):
    n = ln(0.001) / ln(0.99995) ≈ 138,150 samples ≈ 2.9 s at 48 kHz

Higher partials use smaller decay factors, so the tone starts bright and
mellows towards the fundamental, which is what a struck metal surface does.

Everything is kept in f64. Single precision phase accumulators drift
audibly over multi-second tails and the cost difference is negligible for
three partials per voice.
*/

/// One sinusoidal component with exponential amplitude decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    pub phase: f64,
    pub phase_increment: f64,
    pub amplitude: f64,
    pub decay: f64,
}

impl Partial {
    pub const fn silent() -> Self {
        Self {
            phase: 0.0,
            phase_increment: 0.0,
            amplitude: 0.0,
            decay: 0.0,
        }
    }

    /// Restart at phase zero for the given frequency.
    pub fn strike(&mut self, frequency: f64, sample_rate: f64, amplitude: f64, decay: f64) {
        self.phase = 0.0;
        self.phase_increment = TAU * frequency / sample_rate;
        self.amplitude = amplitude;
        self.decay = decay;
    }

    /// Current output, then advance phase and amplitude by one sample.
    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        let out = self.phase.sin() * self.amplitude;

        self.phase += self.phase_increment;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        self.amplitude *= self.decay;

        out
    }
}

impl Default for Partial {
    fn default() -> Self {
        Self::silent()
    }
}
