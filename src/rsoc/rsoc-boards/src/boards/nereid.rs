//! Nereid: Kintex-7 PCIe x1 card with DDR3. The host reaches the SoC over PCIe.

use rsoc_core::clock::PllFamily;
use rsoc_core::platform::{
    Board, IoResource, IoStandard::DiffSstl15, IoStandard::Lvcmos15, IoStandard::Lvcmos33,
    IoStandard::Sstl15, Programmer, Revision, Subsignal, TargetKind,
};

static CLK100: [Subsignal; 2] = [Subsignal::new("p", "AA10"), Subsignal::new("n", "AB10")];

static RGB_LED: [Subsignal; 3] = [
    Subsignal::new("r", "W21"),
    Subsignal::new("g", "Y21"),
    Subsignal::new("b", "AA21"),
];

static SERIAL: [Subsignal; 2] = [Subsignal::new("tx", "V21"), Subsignal::new("rx", "U21")];

// Transceiver pins take no I/O standard
static PCIE_X1: [Subsignal; 7] = [
    Subsignal::new("rst_n", "AC21").iostandard(Lvcmos33),
    Subsignal::new("clk_p", "K6"),
    Subsignal::new("clk_n", "K5"),
    Subsignal::new("rx_p", "J4"),
    Subsignal::new("rx_n", "J3"),
    Subsignal::new("tx_p", "H2"),
    Subsignal::new("tx_n", "H1"),
];

static DDRAM: [Subsignal; 15] = [
    Subsignal::new("a", "AE11 AF9 AD10 AB11 AA9 AD11 AC9 AB9 AF10 AE10 AD9 AC11 AF13 AE12 AD13"),
    Subsignal::new("ba", "AD8 Y10 Y11"),
    Subsignal::new("ras_n", "AE13"),
    Subsignal::new("cas_n", "AC12"),
    Subsignal::new("we_n", "AA13"),
    Subsignal::new("dm", "AC14 AF18"),
    Subsignal::new(
        "dq",
        "AA15 AA14 AA17 AB15 AE15 AE16 AD16 AB14 AF14 AD15 AE17 AF15 AC16 AB16 AD14 AC17",
    )
    .misc(&["IN_TERM=UNTUNED_SPLIT_40"]),
    Subsignal::new("dqs_p", "Y15 AE18").iostandard(DiffSstl15),
    Subsignal::new("dqs_n", "Y16 AF19").iostandard(DiffSstl15),
    Subsignal::new("clk_p", "AB12").iostandard(DiffSstl15),
    Subsignal::new("clk_n", "AC13").iostandard(DiffSstl15),
    Subsignal::new("cke", "AA12"),
    Subsignal::new("odt", "Y12"),
    Subsignal::new("cs_n", "Y13"),
    Subsignal::new("reset_n", "AA8").iostandard(Lvcmos15),
];

static IO: [IoResource; 6] = [
    IoResource::subsignals("clk100", 0, &CLK100).iostandard(DiffSstl15),
    IoResource::pins("cpu_reset", 0, "AF20").iostandard(Lvcmos15),
    IoResource::subsignals("rgb_led", 0, &RGB_LED).iostandard(Lvcmos33),
    IoResource::subsignals("serial", 0, &SERIAL).iostandard(Lvcmos33),
    IoResource::subsignals("pcie_x1", 0, &PCIE_X1),
    IoResource::subsignals("ddram", 0, &DDRAM)
        .iostandard(Sstl15)
        .misc(&["SLEW=FAST"]),
];

static REVISIONS: [Revision; 1] = [Revision { name: "1.0", io: &[] }];

pub static NEREID: Board = Board {
    name: "nereid",
    family: PllFamily::Series7,
    target: TargetKind::PcieSoc,
    devices: &["xc7k160t"],
    default_device: "xc7k160t",
    package: "-fbg676-1",
    revisions: &REVISIONS,
    default_revision: "1.0",
    io: &IO,
    default_clk_name: "clk100",
    default_clk_freq_hz: 100_000_000,
    reset_name: "cpu_reset",
    toolchain: "vivado",
    programmer: Programmer::Vivado,
};

#[cfg(test)]
mod nereid_tests {
    use super::*;
    use rsoc_core::platform::Platform;

    #[test]
    fn test_pcie_pins() {
        let mut plat = Platform::new(&NEREID, None, None).unwrap();
        assert_eq!(plat.part(), "xc7k160t-fbg676-1");
        plat.request("pcie_x1", 0).unwrap();
        let pins = plat.assignments();
        assert_eq!(pins.len(), 7);
        assert_eq!(pins[0].port, "pcie_x1_rst_n");
        assert_eq!(pins[0].iostandard, Some(Lvcmos33));
        assert_eq!(pins[1].iostandard, None);
    }
}
