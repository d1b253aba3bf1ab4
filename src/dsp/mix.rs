//! Frame fan-out and gain primitives for interleaved buffers.

/*
Summing Voices
==============

Polyphony is plain addition. Each sounding voice adds its samples on top of
whatever is already in the output buffer:

    out[i] = v1[i] + v2[i] + ... + vN[i]

The buffer must start at zero for every callback, otherwise the previous
block leaks into the next one.


Interleaved Frames
------------------

Drivers hand over one flat buffer with the channels of each frame next to
each other:

    [ L0 R0 | L1 R1 | L2 R2 | ... ]      channels = 2
      frame0  frame1  frame2

A voice here is mono, so its sample for frame n is added to every slot of
that frame. Stereo output is just two identical copies; nothing is panned.


Clipping Risk
-------------

Ten voices that each peak at 2.0 can sum to 20.0, far outside [-1, +1].
Summing never clamps. Gain staging and the soft clipper downstream are what
bring the signal back into range.
*/

/// Add a mono sample to every channel of one interleaved frame.
#[inline]
pub fn add_to_frame(frame: &mut [f32], sample: f32) {
    for slot in frame.iter_mut() {
        *slot += sample;
    }
}

/// Multiply every sample by a constant gain.
#[inline]
pub fn apply_gain(buffer: &mut [f32], gain: f32) {
    if gain == 1.0 {
        return;
    }
    for sample in buffer.iter_mut() {
        *sample *= gain;
    }
}
