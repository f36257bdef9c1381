//! `synth-bench env`: show the host and the tool versions a run would use.

use std::fmt::Write;

use crate::SynthResult;
use crate::config::SynthConfig;
use crate::core::EnvironmentInfo;

fn unknown(value: Option<&str>) -> &str {
    value.unwrap_or("not found")
}

pub fn render(config: &SynthConfig, env: &EnvironmentInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Host:");
    let _ = writeln!(out, "  OS:              {}", env.os);
    let _ = writeln!(out, "  Hostname:        {}", unknown(env.hostname.as_deref()));
    let _ = writeln!(out, "  CPU:             {}", unknown(env.cpu_model.as_deref()));
    if let Some(cores) = env.cpu_cores {
        let _ = writeln!(out, "  Cores:           {cores}");
    }
    if let Some(ram) = env.total_ram_bytes {
        let _ = writeln!(out, "  RAM:             {:.1} GiB", ram as f64 / (1u64 << 30) as f64);
    }
    let _ = writeln!(out, "\nTools:");
    let tools = &config.tools;
    let _ = writeln!(out, "  circt-verilog:   {}", tools.circt_verilog.display());
    let _ = writeln!(out, "  circt-synth:     {}", tools.circt_synth.display());
    let _ = writeln!(out, "  circt-translate: {}", tools.circt_translate.display());
    let _ = writeln!(out, "  yosys:           {}", tools.yosys.display());
    let _ = writeln!(out, "  CIRCT version:   {}", unknown(env.circt_version.as_deref()));
    let _ = writeln!(out, "  Yosys version:   {}", unknown(env.yosys_version.as_deref()));
    let _ = writeln!(out, "\nLUT-K: {}", config.lut_k);
    out
}

pub fn run(config: &SynthConfig) -> SynthResult<()> {
    let env = EnvironmentInfo::detect(&config.tools);
    print!("{}", render(config, &env));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_marks_missing_tools() {
        let config = SynthConfig::default();
        let env = EnvironmentInfo {
            yosys_version: Some("0.38".into()),
            ..EnvironmentInfo::default()
        };
        let text = render(&config, &env);
        assert!(text.contains("CIRCT version:   not found"));
        assert!(text.contains("Yosys version:   0.38"));
        assert!(text.contains("yosys:           yosys"));
        assert!(text.contains("LUT-K: 6"));
    }
}
