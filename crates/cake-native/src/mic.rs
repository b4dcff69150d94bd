//! Default input device captured into a mono sample ring.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Newest mono samples, oldest dropped first.
struct SampleRing {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SampleRing {
    fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, s: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(s);
    }
}

pub struct Microphone {
    _stream: cpal::Stream,
    ring: Arc<Mutex<SampleRing>>,
}

impl Microphone {
    /// `None` when there is no usable input device; the scene then runs on
    /// its synthetic spectrum.
    pub fn start(capacity: usize) -> Option<Self> {
        let host = cpal::default_host();
        let device = host.default_input_device()?;
        let config = device.default_input_config().ok()?;
        let channels = config.channels() as usize;
        log::info!(
            "microphone: {} ({} Hz, {} ch, {:?})",
            device.name().unwrap_or_else(|_| "unknown".into()),
            config.sample_rate().0,
            channels,
            config.sample_format()
        );

        let ring = Arc::new(Mutex::new(SampleRing::new(capacity.max(1))));
        let err_fn = |err| log::error!("microphone stream error: {err}");
        let stream_config: cpal::StreamConfig = config.clone().into();
        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_input::<f32>(&device, &stream_config, channels, Arc::clone(&ring), err_fn)
            }
            cpal::SampleFormat::I16 => {
                build_input::<i16>(&device, &stream_config, channels, Arc::clone(&ring), err_fn)
            }
            cpal::SampleFormat::U16 => {
                build_input::<u16>(&device, &stream_config, channels, Arc::clone(&ring), err_fn)
            }
            other => {
                log::warn!("microphone: unsupported sample format {other:?}");
                return None;
            }
        }
        .map_err(|e| log::warn!("microphone: {e}"))
        .ok()?;
        stream.play().map_err(|e| log::warn!("microphone: {e}")).ok()?;
        Some(Self {
            _stream: stream,
            ring,
        })
    }

    /// Copies the buffered samples, oldest first, into `out`.
    pub fn snapshot(&self, out: &mut Vec<f32>) {
        out.clear();
        if let Ok(ring) = self.ring.lock() {
            out.extend(ring.samples.iter().copied());
        }
    }
}

fn build_input<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    ring: Arc<Mutex<SampleRing>>,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    let channels = channels.max(1);
    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let Ok(mut ring) = ring.lock() else {
                return;
            };
            for frame in data.chunks(channels) {
                let sum: f32 = frame
                    .iter()
                    .map(|&s| <f32 as cpal::FromSample<T>>::from_sample_(s))
                    .sum();
                ring.push(sum / frame.len() as f32);
            }
        },
        err_fn,
        None,
    )
}
