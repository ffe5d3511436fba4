//! noisegen CLI: real-time noise player.

use std::error::Error;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use noisegen_engine::{EngineConfig, ModeFlag, NoiseEngine};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Frames rendered per engine call inside the device callback.
const MAX_BLOCK_FRAMES: usize = 4096;

#[derive(Debug, Default)]
struct Args {
    list_devices: bool,
    device_name: Option<String>,
    sample_rate: Option<u32>,
    channels: Option<u16>,
    duration_sec: Option<u64>,
    mode: Option<String>,
    gain_db: Option<f32>,
    color: Option<f32>,
    seed: Option<u64>,
    calibrated: bool,
}

fn parse_args() -> Args {
    let mut a = Args::default();
    for s in std::env::args().skip(1) {
        if s == "--list-devices" { a.list_devices = true; continue; }
        if s == "--calibrated"   { a.calibrated = true;   continue; }
        if let Some(rest) = s.strip_prefix("--device=")       { a.device_name = Some(rest.to_string()); continue; }
        if let Some(rest) = s.strip_prefix("--sample-rate=")  { a.sample_rate = rest.parse().ok();      continue; }
        if let Some(rest) = s.strip_prefix("--channels=")     { a.channels    = rest.parse().ok();      continue; }
        if let Some(rest) = s.strip_prefix("--duration=")     { a.duration_sec= rest.parse().ok();      continue; }
        if let Some(rest) = s.strip_prefix("--mode=")         { a.mode        = Some(rest.to_string()); continue; }
        if let Some(rest) = s.strip_prefix("--gain-db=")      { a.gain_db     = rest.parse().ok();      continue; }
        if let Some(rest) = s.strip_prefix("--color=")        { a.color       = rest.parse().ok();      continue; }
        if let Some(rest) = s.strip_prefix("--seed=")         { a.seed        = rest.parse().ok();      continue; }
        warn!("unknown arg: {s}");
    }
    a
}

fn list_output_devices() -> Result<(), Box<dyn Error>> {
    let host = cpal::default_host();
    println!("Available output devices:");
    for dev in host.output_devices()? {
        println!("- {}", dev.name()?);
    }
    Ok(())
}

fn pick_device(args: &Args) -> Result<cpal::Device, Box<dyn Error>> {
    let host = cpal::default_host();
    if let Some(name) = &args.device_name {
        for d in host.output_devices()? {
            if d.name()? == *name { return Ok(d); }
        }
        return Err(format!("requested device not found: {name}").into());
    }
    host.default_output_device()
        .ok_or_else(|| "no default output device".into())
}

fn choose_config(
    device: &cpal::Device,
    req_sr: Option<u32>,
    req_ch: Option<u16>,
) -> Result<cpal::SupportedStreamConfig, Box<dyn Error>> {
    if req_sr.is_none() && req_ch.is_none() {
        return Ok(device.default_output_config()?);
    }

    // Score every range: sample-rate distance dominates channel distance.
    let mut best: Option<(u64, cpal::SupportedStreamConfigRange)> = None;
    for range in device.supported_output_configs()? {
        let ch     = range.channels();
        let sr_min = range.min_sample_rate().0;
        let sr_max = range.max_sample_rate().0;

        let ch_pen = match req_ch { Some(c) => u64::from(ch.abs_diff(c)), None => 0 };
        let sr_pen = match req_sr {
            Some(sr) => if (sr_min..=sr_max).contains(&sr) { 0 } else { u64::from(sr_min.abs_diff(sr).min(sr_max.abs_diff(sr))) },
            None => 0,
        };

        let score = sr_pen.saturating_mul(1000) + ch_pen;
        if best.as_ref().map_or(true, |(s, _)| score < *s) {
            best = Some((score, range));
        }
    }

    let (_, range) = best.ok_or_else(|| "no supported output configs".to_string())?;

    let pick_sr = match req_sr {
        Some(sr) => cpal::SampleRate(sr.clamp(range.min_sample_rate().0, range.max_sample_rate().0)),
        None => range.max_sample_rate(),
    };

    Ok(range.with_sample_rate(pick_sr))
}

fn make_config(args: &Args, channels: usize) -> EngineConfig {
    let base = if args.calibrated { EngineConfig::calibrated() } else { EngineConfig::default() };
    let cfg = base.with_channels(channels);
    match args.seed {
        Some(seed) => cfg.with_seed(seed),
        None => cfg,
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    cfg: &cpal::StreamConfig,
    mut engine: NoiseEngine,
    peak: Arc<AtomicU32>,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, Box<dyn Error>>
where
    T: cpal::Sample + cpal::FromSample<f32> + cpal::SizedSample + Send + 'static,
{
    let channels = cfg.channels as usize;
    // Allocated here, never in the callback.
    let mut scratch = vec![0.0_f32; engine.max_block_size() * channels];

    let stream = device.build_output_stream(
        cfg,
        move |output: &mut [T], _| {
            for chunk in output.chunks_mut(scratch.len()) {
                let block = &mut scratch[..chunk.len()];
                engine.process_interleaved(block, channels);

                let mut block_peak = 0.0_f32;
                for (o, &s) in chunk.iter_mut().zip(block.iter()) {
                    let s = s.clamp(-1.0, 1.0);
                    block_peak = block_peak.max(s.abs());
                    *o = T::from_sample(s);
                }
                // Non-negative floats order the same as their bit patterns.
                peak.fetch_max(block_peak.to_bits(), Ordering::Relaxed);
            }
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args();

    if args.list_devices {
        list_output_devices()?;
        return Ok(());
    }

    let device  = pick_device(&args)?;
    let sup_cfg = choose_config(&device, args.sample_rate, args.channels)?;
    let sample_format = sup_cfg.sample_format();
    let mut cfg = sup_cfg.config();

    if let Some(sr) = args.sample_rate { cfg.sample_rate = cpal::SampleRate(sr); }
    if let Some(ch) = args.channels    { cfg.channels    = ch; }

    let mode: ModeFlag = match args.mode.as_deref() {
        Some(name) => name.parse()?,
        None => ModeFlag::Uniform,
    };

    #[allow(clippy::cast_precision_loss)]
    let sr_f32 = cfg.sample_rate.0 as f32;
    let mut engine = NoiseEngine::new(make_config(&args, cfg.channels as usize))?;
    let params = engine.params();
    params.select_mode(mode);
    if let Some(db) = args.gain_db { params.set_gain_db(db); }
    if let Some(c)  = args.color   { params.set_color(c); }
    engine.prepare(sr_f32, MAX_BLOCK_FRAMES)?;

    let device_name = device.name()?;
    info!(device = %device_name, ?cfg, ?sample_format, "output stream");
    info!(%mode, sample_rate = engine.sample_rate(), gain_db = params.gain_db(), color = params.color(), "noise settings");
    if let Some(d) = args.duration_sec { info!("auto-stop after {d} seconds"); }

    let peak = Arc::new(AtomicU32::new(0));
    let err_fn = |e: cpal::StreamError| warn!("stream error: {e}");

    let stream = match sample_format {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &cfg, engine, Arc::clone(&peak), err_fn)?,
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &cfg, engine, Arc::clone(&peak), err_fn)?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &cfg, engine, Arc::clone(&peak), err_fn)?,
        other => return Err(format!("unsupported device sample format: {other:?}").into()),
    };

    stream.play()?;

    let started = Instant::now();
    let stop_after = args.duration_sec.map(Duration::from_secs);
    loop {
        std::thread::sleep(Duration::from_secs(1));
        let p = f32::from_bits(peak.swap(0, Ordering::Relaxed));
        info!("peak ~ {p:.3}");
        if stop_after.is_some_and(|d| started.elapsed() >= d) {
            return Ok(());
        }
    }
}
