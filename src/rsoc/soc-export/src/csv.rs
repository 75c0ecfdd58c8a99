use rsoc_core::soc::{ConstValue, Soc};

/// Flat CSV listing of the CSR map, constants and memory regions.
///
/// Rows are `kind,name,value,size,access`; unused columns stay empty.
pub fn csr_csv(soc: &Soc) -> String {
    let mut out = String::new();
    for region in soc.csr_map().regions() {
        out += &format!("csr_base,{},0x{:08x},,\n", region.name, region.base);
    }
    for region in soc.csr_map().regions() {
        for (addr, reg) in region.registers() {
            out += &format!(
                "csr_register,{}_{},0x{:08x},{},{}\n",
                region.name,
                reg.name,
                addr,
                reg.words(),
                reg.access().as_str()
            );
        }
    }
    for (name, value) in soc.constants() {
        let value = match value {
            ConstValue::Int(v) => v.to_string(),
            ConstValue::Str(s) => s.clone(),
        };
        out += &format!("constant,{},{},,\n", name.to_lowercase(), value);
    }
    for region in soc.memory_regions() {
        out += &format!(
            "memory_region,{},0x{:08x},{},\n",
            region.name, region.base, region.size
        );
    }
    out
}

#[cfg(test)]
mod csv_tests {
    use super::*;
    use rsoc_core::platform::Platform;
    use rsoc_core::soc::{compose, SocConfig};

    #[test]
    fn test_ulx3s_csv() {
        let board = rsoc_boards::find("ulx3s").unwrap();
        let plat = Platform::new(board, None, None).unwrap();
        let soc = compose(plat, SocConfig::for_board(board)).unwrap();
        let csv = csr_csv(&soc);

        assert!(csv.starts_with("csr_base,ctrl,0x80000000,,\n"));
        assert!(csv.contains("csr_base,uart,0x80001800,,\n"));
        assert!(csv.contains("csr_register,leds_out,"));
        assert!(csv.contains("csr_register,uart_txfull,0x80001804,1,ro\n"));
        assert!(csv.contains("constant,uart_interrupt,2,,\n"));
        assert!(csv.contains("constant,config_clock_frequency,50000000,,\n"));
        assert!(csv.contains("memory_region,main_ram,0x40000000,33554432,\n"));
        assert!(!csv.contains("pcie"));
    }
}
