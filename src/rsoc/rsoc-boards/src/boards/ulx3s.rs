//! Radiona ULX3S: Lattice ECP5 with SDR SDRAM and a USB serial console.

use rsoc_core::clock::PllFamily;
use rsoc_core::platform::{
    Board, IoResource, IoStandard::Lvcmos33, IoStandard::Lvcmos33D, Programmer, Revision,
    Subsignal, TargetKind,
};

static SERIAL: [Subsignal; 2] = [
    Subsignal::new("tx", "L4").iostandard(Lvcmos33),
    Subsignal::new("rx", "M1").iostandard(Lvcmos33),
];

static SDRAM: [Subsignal; 9] = [
    Subsignal::new("a", "M20 M19 L20 L19 K20 K19 K18 J20 J19 H20 N19 G20 G19"),
    Subsignal::new(
        "dq",
        "J16 L18 M18 N18 P18 T18 T17 U20 E19 D20 D19 C20 E18 F18 J18 J17",
    ),
    Subsignal::new("we_n", "T20"),
    Subsignal::new("ras_n", "R20"),
    Subsignal::new("cas_n", "T19"),
    Subsignal::new("cs_n", "P20"),
    Subsignal::new("cke", "F20"),
    Subsignal::new("ba", "P19 N20"),
    Subsignal::new("dm", "U19 E20"),
];

static GPIO0: [Subsignal; 2] = [Subsignal::new("p", "B11"), Subsignal::new("n", "C11")];
static GPIO1: [Subsignal; 2] = [Subsignal::new("p", "A10"), Subsignal::new("n", "A11")];
static GPIO2: [Subsignal; 2] = [Subsignal::new("p", "A9"), Subsignal::new("n", "B10")];
static GPIO3: [Subsignal; 2] = [Subsignal::new("p", "B9"), Subsignal::new("n", "C10")];

static USB: [Subsignal; 3] = [
    Subsignal::new("d_p", "D15"),
    Subsignal::new("d_n", "E15"),
    Subsignal::new("pullup", "B12 C12"),
];

static SPIFLASH: [Subsignal; 5] = [
    Subsignal::new("cs_n", "R2"),
    Subsignal::new("miso", "V2"),
    Subsignal::new("mosi", "W2"),
    Subsignal::new("wp", "Y2"),
    Subsignal::new("hold", "W1"),
];

static SPIFLASH4X: [Subsignal; 2] = [
    Subsignal::new("cs_n", "R2"),
    Subsignal::new("dq", "W2 V2 Y2 W1"),
];

// Only the positive legs; the LVCMOS33D buffer drives the complement
static GPDI: [Subsignal; 4] = [
    Subsignal::new("clk_p", "A17").iostandard(Lvcmos33D).misc(&["DRIVE=4"]),
    Subsignal::new("data0_p", "A12").iostandard(Lvcmos33D).misc(&["DRIVE=4"]),
    Subsignal::new("data1_p", "A14").iostandard(Lvcmos33D).misc(&["DRIVE=4"]),
    Subsignal::new("data2_p", "A16").iostandard(Lvcmos33D).misc(&["DRIVE=4"]),
];

static OLED_SPI: [Subsignal; 2] = [Subsignal::new("clk", "P4"), Subsignal::new("mosi", "P3")];

static OLED_CTL: [Subsignal; 3] = [
    Subsignal::new("dc", "P1"),
    Subsignal::new("resn", "P2"),
    Subsignal::new("csn", "N2"),
];

static LEE_SDCARD: [Subsignal; 2] = [
    Subsignal::new("clk", "C16"),
    Subsignal::new("cmd", "B17").misc(&["PULLMODE=UP"]),
];

static IO_COMMON: [IoResource; 27] = [
    IoResource::pins("clk25", 0, "G2").iostandard(Lvcmos33),
    IoResource::pins("rst", 0, "R1").iostandard(Lvcmos33),
    IoResource::pins("user_led", 0, "B2").iostandard(Lvcmos33),
    IoResource::pins("user_led", 1, "C2").iostandard(Lvcmos33),
    IoResource::pins("user_led", 2, "C1").iostandard(Lvcmos33),
    IoResource::pins("user_led", 3, "D2").iostandard(Lvcmos33),
    IoResource::pins("user_led", 4, "D1").iostandard(Lvcmos33),
    IoResource::pins("user_led", 5, "E2").iostandard(Lvcmos33),
    IoResource::pins("user_led", 6, "E1").iostandard(Lvcmos33),
    IoResource::pins("user_led", 7, "H3").iostandard(Lvcmos33),
    IoResource::subsignals("serial", 0, &SERIAL),
    IoResource::pins("sdram_clock", 0, "F19").iostandard(Lvcmos33),
    IoResource::subsignals("sdram", 0, &SDRAM)
        .iostandard(Lvcmos33)
        .misc(&["SLEWRATE=FAST"]),
    IoResource::subsignals("gpio", 0, &GPIO0).iostandard(Lvcmos33),
    IoResource::subsignals("gpio", 1, &GPIO1).iostandard(Lvcmos33),
    IoResource::subsignals("gpio", 2, &GPIO2).iostandard(Lvcmos33),
    IoResource::subsignals("gpio", 3, &GPIO3).iostandard(Lvcmos33),
    IoResource::subsignals("usb", 0, &USB).iostandard(Lvcmos33),
    IoResource::subsignals("spiflash", 0, &SPIFLASH).iostandard(Lvcmos33),
    IoResource::subsignals("spiflash4x", 0, &SPIFLASH4X).iostandard(Lvcmos33),
    IoResource::subsignals("gpdi", 0, &GPDI),
    IoResource::subsignals("oled_spi", 0, &OLED_SPI).iostandard(Lvcmos33),
    IoResource::subsignals("oled_ctl", 0, &OLED_CTL).iostandard(Lvcmos33),
    IoResource::subsignals("lee_sdcard", 0, &LEE_SDCARD)
        .iostandard(Lvcmos33)
        .misc(&["SLEWRATE=FAST"]),
    IoResource::pins("wifi_gpio0", 0, "L2").iostandard(Lvcmos33),
    IoResource::pins("ext0p", 0, "B11").iostandard(Lvcmos33),
    IoResource::pins("ext1p", 0, "A10").iostandard(Lvcmos33),
];

// SD card wiring moved between the 1.7 and 2.0 layouts
static SPISDCARD_1_7: [Subsignal; 4] = [
    Subsignal::new("clk", "J1"),
    Subsignal::new("mosi", "J3").misc(&["PULLMODE=UP"]),
    Subsignal::new("cs_n", "H1").misc(&["PULLMODE=UP"]),
    Subsignal::new("miso", "K2").misc(&["PULLMODE=UP"]),
];

static SDCARD_1_7: [Subsignal; 3] = [
    Subsignal::new("clk", "J1"),
    Subsignal::new("cmd", "J3").misc(&["PULLMODE=UP"]),
    Subsignal::new("data", "K2 K1 H2 H1").misc(&["PULLMODE=UP"]),
];

static SPISDCARD_2_0: [Subsignal; 4] = [
    Subsignal::new("clk", "H2"),
    Subsignal::new("mosi", "J1").misc(&["PULLMODE=UP"]),
    Subsignal::new("cs_n", "K2").misc(&["PULLMODE=UP"]),
    Subsignal::new("miso", "J3").misc(&["PULLMODE=UP"]),
];

static SDCARD_2_0: [Subsignal; 5] = [
    Subsignal::new("clk", "H2"),
    Subsignal::new("cmd", "J1").misc(&["PULLMODE=UP"]),
    Subsignal::new("data", "J3 H1 K1 K2").misc(&["PULLMODE=UP"]),
    Subsignal::new("cd", "N5"),
    Subsignal::new("wp", "P5"),
];

static IO_1_7: [IoResource; 2] = [
    IoResource::subsignals("spisdcard", 0, &SPISDCARD_1_7)
        .iostandard(Lvcmos33)
        .misc(&["SLEWRATE=FAST"]),
    IoResource::subsignals("sdcard", 0, &SDCARD_1_7)
        .iostandard(Lvcmos33)
        .misc(&["SLEWRATE=FAST"]),
];

static IO_2_0: [IoResource; 2] = [
    IoResource::subsignals("spisdcard", 0, &SPISDCARD_2_0)
        .iostandard(Lvcmos33)
        .misc(&["SLEWRATE=FAST"]),
    IoResource::subsignals("sdcard", 0, &SDCARD_2_0)
        .iostandard(Lvcmos33)
        .misc(&["SLEWRATE=FAST"]),
];

static REVISIONS: [Revision; 2] = [
    Revision {
        name: "1.7",
        io: &IO_1_7,
    },
    Revision {
        name: "2.0",
        io: &IO_2_0,
    },
];

pub static ULX3S: Board = Board {
    name: "ulx3s",
    family: PllFamily::Ecp5,
    target: TargetKind::SerialSoc,
    devices: &["LFE5U-12F", "LFE5U-25F", "LFE5U-45F", "LFE5U-85F"],
    default_device: "LFE5U-45F",
    package: "-6BG381C",
    revisions: &REVISIONS,
    default_revision: "2.0",
    io: &IO_COMMON,
    default_clk_name: "clk25",
    default_clk_freq_hz: 25_000_000,
    reset_name: "rst",
    toolchain: "trellis",
    programmer: Programmer::UjProg,
};

#[cfg(test)]
mod ulx3s_tests {
    use super::*;
    use rsoc_core::platform::Platform;
    use rsoc_core::ConfigError;

    #[test]
    fn test_revision_selects_sdcard_pins() {
        let mut plat = Platform::new(&ULX3S, None, Some("1.7")).unwrap();
        plat.request("sdcard", 0).unwrap();
        let pins = plat.assignments();
        assert_eq!(pins[0].port, "sdcard_clk");
        assert_eq!(pins[0].pin, "J1");
        assert_eq!(pins.len(), 6);

        let mut plat = Platform::new(&ULX3S, None, None).unwrap();
        assert_eq!(plat.revision(), "2.0");
        plat.request("sdcard", 0).unwrap();
        assert_eq!(plat.assignments()[0].pin, "H2");
        assert!(plat.has_resource("sdcard", 0));
    }

    #[test]
    fn test_devices() {
        assert_eq!(
            Platform::new(&ULX3S, Some("LFE5U-85F"), None)
                .unwrap()
                .part(),
            "LFE5U-85F-6BG381C"
        );
        assert!(matches!(
            Platform::new(&ULX3S, Some("LFE5U-65F"), None),
            Err(ConfigError::UnsupportedDevice { .. })
        ));
    }
}
