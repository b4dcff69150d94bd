use cake_core::constants::SPECTRUM_BINS;
use wasm_bindgen::JsValue;
use web_sys as web;

/// Media element -> analyser -> speakers. The analyser is read once per frame.
pub(crate) struct AudioTap {
    ctx: web::AudioContext,
    analyser: web::AnalyserNode,
    _source: web::MediaElementAudioSourceNode,
    bins: Vec<u8>,
}

impl AudioTap {
    pub(crate) fn connect(element: &web::HtmlMediaElement) -> Result<Self, JsValue> {
        let ctx = web::AudioContext::new()?;
        let source = ctx.create_media_element_source(element)?;
        let analyser = ctx.create_analyser()?;
        // 64 frequency bins
        analyser.set_fft_size((SPECTRUM_BINS * 2) as u32);
        source.connect_with_audio_node(&analyser)?;
        analyser.connect_with_audio_node(&ctx.destination())?;
        Ok(Self {
            ctx,
            analyser,
            _source: source,
            bins: vec![0; SPECTRUM_BINS],
        })
    }

    /// Current byte spectrum, or `None` while the context is not running
    /// (browsers start it suspended until a user gesture).
    pub(crate) fn snapshot(&mut self) -> Option<&[u8]> {
        if self.ctx.state() != web::AudioContextState::Running {
            return None;
        }
        self.analyser.get_byte_frequency_data(&mut self.bins);
        Some(&self.bins)
    }

    pub(crate) fn resume(&self) {
        if self.ctx.state() == web::AudioContextState::Suspended {
            if let Err(e) = self.ctx.resume() {
                log::warn!("AudioContext resume error: {:?}", e);
            }
        }
    }
}
