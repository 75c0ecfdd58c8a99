use rsoc_core::platform::Platform;
use rsoc_core::soc::{compose, ConstValue, Soc, SocConfig};
use rsoc_core::ConfigError;

fn build(board: &str, revision: Option<&str>, config: Option<SocConfig>) -> Result<Soc, ConfigError> {
    let board = rsoc_boards::find(board)?;
    let plat = Platform::new(board, None, revision)?;
    compose(plat, config.unwrap_or_else(|| SocConfig::for_board(board)))
}

fn constant(soc: &Soc, name: &str) -> Option<u64> {
    match soc.constants().get(name) {
        Some(ConstValue::Int(v)) => Some(*v),
        _ => None,
    }
}

#[test]
fn test_nereid_csr_locations() {
    let soc = build("nereid", None, None).unwrap();
    let map = soc.csr_map();
    let index = |name: &str| map.get(name).map(|r| r.index);

    assert_eq!(index("ctrl"), Some(0));
    assert_eq!(index("crg"), Some(1));
    assert_eq!(index("uart"), Some(3));
    assert_eq!(index("identifier_mem"), Some(4));
    assert_eq!(index("timer0"), Some(5));
    assert_eq!(index("dna"), Some(10));
    assert_eq!(index("xadc"), Some(11));
    assert_eq!(index("pcie_phy"), Some(12));
    assert_eq!(index("pcie_dma"), Some(13));
    assert_eq!(index("pcie_msi"), Some(14));
    assert_eq!(index("pcie_uart"), Some(15));
    assert_eq!(index("uart_phy"), None);
    assert_eq!(index("sdram"), None);
}

#[test]
fn test_nereid_interrupts() {
    let soc = build("nereid", None, None).unwrap();
    assert_eq!(constant(&soc, "DMA_READER_INTERRUPT"), Some(0));
    assert_eq!(constant(&soc, "DMA_WRITER_INTERRUPT"), Some(1));
    assert_eq!(constant(&soc, "TIMER0_INTERRUPT"), Some(1));
    assert_eq!(constant(&soc, "UART_INTERRUPT"), Some(2));
    assert!(soc.pcie_uart().is_some());
    assert!(soc.msi().is_some());
    // LED pads are claimed for the constraints even without a driver model
    assert!(soc
        .platform()
        .requested()
        .iter()
        .any(|io| io.name == "rgb_led"));
}

#[test]
fn test_nereid_without_pcie_uart() {
    let config = SocConfig {
        with_pcie_uart: false,
        ..SocConfig::default()
    };
    let soc = build("nereid", None, Some(config)).unwrap();
    assert!(soc.pcie_uart().is_none());
    assert!(soc.csr_map().get("pcie_uart").is_none());
    assert_eq!(soc.csr_map().get("uart_phy").map(|r| r.index), Some(2));
    assert!(soc
        .platform()
        .requested()
        .iter()
        .any(|io| io.name == "serial"));
}

#[test]
fn test_nereid_external_ddr() {
    let config = SocConfig {
        integrated_main_ram_size: 0,
        ..SocConfig::default()
    };
    let soc = build("nereid", None, Some(config)).unwrap();
    assert_eq!(soc.csr_map().get("sdram").map(|r| r.index), Some(8));
    assert!(soc.csr_map().get("ddrphy").is_some());
    let main_ram = soc
        .memory_regions()
        .iter()
        .find(|r| r.name == "main_ram")
        .unwrap();
    assert_eq!(main_ram.size, 0x4000_0000);
}

#[test]
fn test_ulx3s() {
    let soc = build("ulx3s", Some("1.7"), None).unwrap();
    assert_eq!(soc.csr_map().get("leds").map(|r| r.index), Some(7));
    assert_eq!(soc.csr_map().get("sdram").map(|r| r.index), Some(8));
    assert_eq!(constant(&soc, "UART_INTERRUPT"), Some(2));
    assert!(soc.msi_map().is_empty());
    assert_eq!(soc.crg().pll().vco_hz, 400_000_000);
    assert_eq!(
        soc.platform()
            .requested()
            .iter()
            .filter(|io| io.name == "user_led")
            .count(),
        8
    );
}

#[test]
fn test_bad_inputs() {
    assert_eq!(
        build("ulx3s", Some("3.0"), None).err(),
        Some(ConfigError::UnsupportedRevision {
            board: "ulx3s".to_string(),
            revision: "3.0".to_string()
        })
    );
    assert!(matches!(
        build("kc705", None, None),
        Err(ConfigError::UnknownBoard(_))
    ));

    let config = SocConfig {
        csr_data_width: 8,
        ..SocConfig::default()
    };
    assert_eq!(
        build("nereid", None, Some(config)).err(),
        Some(ConfigError::InvalidCsrWidth(8))
    );

    let config = SocConfig {
        sys_clk_freq: 500_000_000,
        ..SocConfig::default()
    };
    assert!(matches!(
        build("nereid", None, Some(config)),
        Err(ConfigError::ClockUnreachable { .. })
    ));
}

#[test]
fn test_huge_sys_clk_freq_is_config_error() {
    for board in ["nereid", "ulx3s"].iter() {
        let config = SocConfig {
            sys_clk_freq: 10_000_000_000_000_000_000,
            ..SocConfig::for_board(rsoc_boards::find(board).unwrap())
        };
        assert!(matches!(
            build(board, None, Some(config)),
            Err(ConfigError::ClockUnreachable { .. })
        ));
    }
}

#[test]
fn test_export_deterministic() {
    let a = build("nereid", None, None).unwrap();
    let b = build("nereid", None, None).unwrap();
    assert_eq!(soc_export::csr_header(&a), soc_export::csr_header(&b));
    assert_eq!(soc_export::csr_csv(&a), soc_export::csr_csv(&b));
    assert_eq!(
        soc_export::constraints(a.platform()),
        soc_export::constraints(b.platform())
    );
}
