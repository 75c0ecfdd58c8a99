use rsoc_core::soc::Soc;

// Register offsets and sizes are in bus words, as the C accessors expect
pub fn csr_header(soc: &Soc) -> String {
    let mut out = String::new();
    out += "// Generated by rsoc, do not edit\n";
    out += &format!("// {}\n", soc.config().ident);
    out += "#ifndef __GENERATED_CSR_H\n";
    out += "#define __GENERATED_CSR_H\n";

    for region in soc.csr_map().regions() {
        let upper = region.name.to_uppercase();
        out += &format!("\n/* {} */\n", region.name);
        out += &format!("#define CSR_{}_BASE 0x{:08x}L\n", upper, region.base);
        for (addr, reg) in region.registers() {
            let reg_upper = reg.name.to_uppercase();
            out += &format!("#define CSR_{}_{}_ADDR 0x{:08x}L\n", upper, reg_upper, addr);
            out += &format!("#define CSR_{}_{}_SIZE {}\n", upper, reg_upper, reg.words());
        }
    }

    out += "\n/* constants */\n";
    for (name, value) in soc.constants() {
        out += &format!("#define {} {}\n", name, value);
    }

    out += "\n/* memory regions */\n";
    for region in soc.memory_regions() {
        let upper = region.name.to_uppercase();
        out += &format!("#define {}_BASE 0x{:08x}L\n", upper, region.base);
        out += &format!("#define {}_SIZE 0x{:08x}\n", upper, region.size);
    }

    out += "\n#endif\n";
    out
}
