use rsoc_core::clock::PllFamily;
use rsoc_core::platform::{PinAssignment, Platform};

/// Pin constraint dialect of the vendor toolchain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintFormat {
    Lpf, // Lattice, trellis/diamond
    Xdc, // Xilinx, vivado
}

impl ConstraintFormat {
    pub fn for_family(family: PllFamily) -> Self {
        match family {
            PllFamily::Ecp5 => ConstraintFormat::Lpf,
            PllFamily::Series7 => ConstraintFormat::Xdc,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ConstraintFormat::Lpf => "lpf",
            ConstraintFormat::Xdc => "xdc",
        }
    }
}

/// Constraints for every requested resource plus the input clock period
pub fn constraints(platform: &Platform) -> (ConstraintFormat, String) {
    let board = platform.board();
    let format = ConstraintFormat::for_family(board.family);
    let pins = platform.assignments();
    let clk_port = pins
        .iter()
        .map(|p| p.port.as_str())
        .find(|&port| {
            port == board.default_clk_name
                || port.strip_prefix(board.default_clk_name) == Some("_p")
        });
    let period_ns = 1e9 / board.default_clk_freq_hz as f64;

    let text = match format {
        ConstraintFormat::Lpf => {
            let mut out = String::from("BLOCK RESETPATHS;\nBLOCK ASYNCPATHS;\n");
            for pin in pins.iter() {
                out += &lpf_pin(pin);
            }
            if let Some(port) = clk_port {
                out += &format!(
                    "FREQUENCY PORT \"{}\" {:.1} MHZ;\n",
                    port,
                    board.default_clk_freq_hz as f64 / 1e6
                );
            }
            out
        }
        ConstraintFormat::Xdc => {
            let mut out = String::new();
            for pin in pins.iter() {
                out += &xdc_pin(pin);
            }
            if let Some(port) = clk_port {
                out += &format!(
                    "create_clock -name {} -period {:.3} [get_ports {{{}}}]\n",
                    board.default_clk_name, period_ns, port
                );
            }
            out
        }
    };
    (format, text)
}

fn lpf_pin(pin: &PinAssignment) -> String {
    let mut out = format!("LOCATE COMP \"{}\" SITE \"{}\";\n", pin.port, pin.pin);
    let mut attrs: Vec<String> = Vec::new();
    if let Some(std) = pin.iostandard {
        attrs.push(format!("IO_TYPE={}", std.as_str()));
    }
    attrs.extend(pin.misc.iter().map(|m| m.to_string()));
    if !attrs.is_empty() {
        out += &format!("IOBUF PORT \"{}\" {};\n", pin.port, attrs.join(" "));
    }
    out
}

fn xdc_pin(pin: &PinAssignment) -> String {
    let mut out = format!(
        "set_property PACKAGE_PIN {} [get_ports {{{}}}]\n",
        pin.pin, pin.port
    );
    if let Some(std) = pin.iostandard {
        out += &format!(
            "set_property IOSTANDARD {} [get_ports {{{}}}]\n",
            std.as_str(),
            pin.port
        );
    }
    for &misc in pin.misc.iter() {
        let (key, value) = misc.split_once('=').unwrap_or((misc, "TRUE"));
        out += &format!(
            "set_property {} {} [get_ports {{{}}}]\n",
            key, value, pin.port
        );
    }
    out
}

#[cfg(test)]
mod constraints_tests {
    use super::*;

    #[test]
    fn test_lpf() {
        let board = rsoc_boards::find("ulx3s").unwrap();
        let mut plat = Platform::new(board, None, None).unwrap();
        plat.request("clk25", 0).unwrap();
        plat.request("sdram", 0).unwrap();
        let (format, text) = constraints(&plat);

        assert_eq!(format.extension(), "lpf");
        assert!(text.contains("LOCATE COMP \"clk25\" SITE \"G2\";\n"));
        assert!(text.contains("IOBUF PORT \"clk25\" IO_TYPE=LVCMOS33;\n"));
        assert!(text.contains("LOCATE COMP \"sdram_a[12]\" SITE \"G19\";\n"));
        assert!(text.contains("IOBUF PORT \"sdram_we_n\" IO_TYPE=LVCMOS33 SLEWRATE=FAST;\n"));
        assert!(text.ends_with("FREQUENCY PORT \"clk25\" 25.0 MHZ;\n"));
    }

    #[test]
    fn test_xdc() {
        let board = rsoc_boards::find("nereid").unwrap();
        let mut plat = Platform::new(board, None, None).unwrap();
        plat.request("clk100", 0).unwrap();
        plat.request("pcie_x1", 0).unwrap();
        let (format, text) = constraints(&plat);

        assert_eq!(format, ConstraintFormat::Xdc);
        assert!(text.contains("set_property PACKAGE_PIN AA10 [get_ports {clk100_p}]\n"));
        assert!(text.contains("set_property IOSTANDARD DIFF_SSTL15 [get_ports {clk100_n}]\n"));
        assert!(!text.contains("IOSTANDARD LVCMOS33 [get_ports {pcie_x1_clk_p}]"));
        assert!(text.ends_with("create_clock -name clk100 -period 10.000 [get_ports {clk100_p}]\n"));
    }
}
