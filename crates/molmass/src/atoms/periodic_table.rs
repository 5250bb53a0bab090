//! Embedded reference data for the 103-element periodic table.
//!
//! Masses are standard atomic weights in Da with one-standard-deviation
//! uncertainties; isotopes are `(exact mass, fractional abundance)` pairs
//! ordered by ascending mass, with abundances summing to 1 within rounding.
//! Elements with no stable isotopes carry their most stable isotope at
//! abundance 1.0 so they can still flow through the isotope machinery.

pub(crate) struct ElementRecord {
    pub symbol: &'static str,
    pub name: &'static str,
    pub mass: f64,
    pub uncertainty: f64,
    pub charge: f64,
    pub isotopes: &'static [(f64, f64)],
}

macro_rules! element {
    ($symbol:literal, $name:literal, $mass:literal, $unc:literal, $charge:literal, $isotopes:expr) => {
        ElementRecord {
            symbol: $symbol,
            name: $name,
            mass: $mass,
            uncertainty: $unc,
            charge: $charge,
            isotopes: &$isotopes,
        }
    };
}

#[rustfmt::skip]
pub(crate) static ELEMENTS: [ElementRecord; crate::ELEMENT_COUNT] = [
    element!("H",  "Hydrogen",      1.00794,    0.00007,   1.0, [(1.0078246, 0.99985), (2.0141018, 0.00015)]),
    element!("He", "Helium",        4.002602,   0.000002,  0.0, [(3.016029, 0.00000137), (4.002603, 0.99999863)]),
    element!("Li", "Lithium",       6.941,      0.002,     1.0, [(6.015121, 0.075), (7.016003, 0.925)]),
    element!("Be", "Beryllium",     9.012182,   0.000003,  2.0, [(9.012182, 1.0)]),
    element!("B",  "Boron",         10.811,     0.007,     3.0, [(10.012937, 0.199), (11.009305, 0.801)]),
    element!("C",  "Carbon",        12.0107,    0.0008,    4.0, [(12.0, 0.9893), (13.003355, 0.0107)]),
    element!("N",  "Nitrogen",      14.0067,    0.0002,   -3.0, [(14.003074, 0.99632), (15.000109, 0.00368)]),
    element!("O",  "Oxygen",        15.9994,    0.0003,   -2.0, [(15.994915, 0.99757), (16.999131, 0.00038), (17.999160, 0.00205)]),
    element!("F",  "Fluorine",      18.9984032, 0.0000005,-1.0, [(18.998403, 1.0)]),
    element!("Ne", "Neon",          20.1797,    0.0006,    0.0, [(19.992440, 0.9048), (20.993847, 0.0027), (21.991386, 0.0925)]),
    element!("Na", "Sodium",        22.98977,   0.000002,  1.0, [(22.989770, 1.0)]),
    element!("Mg", "Magnesium",     24.3050,    0.0006,    2.0, [(23.985042, 0.7899), (24.985837, 0.1000), (25.982593, 0.1101)]),
    element!("Al", "Aluminium",     26.981538,  0.000002,  3.0, [(26.981538, 1.0)]),
    element!("Si", "Silicon",       28.0855,    0.0003,    4.0, [(27.976927, 0.922297), (28.976495, 0.046832), (29.973770, 0.030871)]),
    element!("P",  "Phosphorus",    30.973761,  0.000002,  5.0, [(30.973762, 1.0)]),
    element!("S",  "Sulphur",       32.065,     0.005,    -2.0, [(31.972071, 0.9493), (32.971458, 0.0076), (33.967867, 0.0429), (35.967081, 0.0002)]),
    element!("Cl", "Chlorine",      35.453,     0.002,    -1.0, [(34.968853, 0.7578), (36.965903, 0.2422)]),
    element!("Ar", "Argon",         39.948,     0.001,     0.0, [(35.967546, 0.003365), (37.962732, 0.000632), (39.962383, 0.996003)]),
    element!("K",  "Potassium",     39.0983,    0.0001,    1.0, [(38.963707, 0.932581), (39.963999, 0.000117), (40.961826, 0.067302)]),
    element!("Ca", "Calcium",       40.078,     0.004,     2.0, [(39.962591, 0.96941), (41.958618, 0.00647), (42.958767, 0.00135), (43.955481, 0.02086), (45.953693, 0.00004), (47.952534, 0.00187)]),
    element!("Sc", "Scandium",      44.955910,  0.000008,  3.0, [(44.955910, 1.0)]),
    element!("Ti", "Titanium",      47.867,     0.001,     4.0, [(45.952629, 0.0825), (46.951764, 0.0744), (47.947947, 0.7372), (48.947871, 0.0541), (49.944792, 0.0518)]),
    element!("V",  "Vanadium",      50.9415,    0.0001,    5.0, [(49.947161, 0.0025), (50.943962, 0.9975)]),
    element!("Cr", "Chromium",      51.9961,    0.0006,    3.0, [(49.946046, 0.04345), (51.940510, 0.83789), (52.940651, 0.09501), (53.938882, 0.02365)]),
    element!("Mn", "Manganese",     54.938049,  0.000009,  2.0, [(54.938047, 1.0)]),
    element!("Fe", "Iron",          55.845,     0.002,     3.0, [(53.939613, 0.05845), (55.934940, 0.91754), (56.935396, 0.02119), (57.933278, 0.00282)]),
    element!("Co", "Cobalt",        58.933200,  0.000009,  2.0, [(58.933198, 1.0)]),
    element!("Ni", "Nickel",        58.6934,    0.0002,    2.0, [(57.935346, 0.680769), (59.930788, 0.262231), (60.931058, 0.011399), (61.928346, 0.036345), (63.927968, 0.009256)]),
    element!("Cu", "Copper",        63.546,     0.003,     2.0, [(62.929599, 0.6917), (64.927792, 0.3083)]),
    element!("Zn", "Zinc",          65.409,     0.004,     2.0, [(63.929145, 0.4863), (65.926035, 0.2790), (66.927129, 0.0410), (67.924846, 0.1875), (69.925325, 0.0062)]),
    element!("Ga", "Gallium",       69.723,     0.001,     3.0, [(68.925580, 0.60108), (70.924700, 0.39892)]),
    element!("Ge", "Germanium",     72.64,      0.01,      4.0, [(69.924250, 0.2084), (71.922079, 0.2754), (72.923463, 0.0773), (73.921177, 0.3628), (75.921401, 0.0761)]),
    element!("As", "Arsenic",       74.92160,   0.00002,  -3.0, [(74.921594, 1.0)]),
    element!("Se", "Selenium",      78.96,      0.03,     -2.0, [(73.922475, 0.0089), (75.919212, 0.0937), (76.919912, 0.0763), (77.917308, 0.2377), (79.916520, 0.4961), (81.916698, 0.0873)]),
    element!("Br", "Bromine",       79.904,     0.001,    -1.0, [(78.918336, 0.5069), (80.916289, 0.4931)]),
    element!("Kr", "Krypton",       83.798,     0.002,     0.0, [(77.920401, 0.0035), (79.916380, 0.0228), (81.913482, 0.1158), (82.914135, 0.1149), (83.911507, 0.5700), (85.910616, 0.1730)]),
    element!("Rb", "Rubidium",      85.4678,    0.0003,    1.0, [(84.911794, 0.7217), (86.909187, 0.2783)]),
    element!("Sr", "Strontium",     87.62,      0.01,      2.0, [(83.913430, 0.0056), (85.909267, 0.0986), (86.908884, 0.0700), (87.905619, 0.8258)]),
    element!("Y",  "Yttrium",       88.90585,   0.00002,   3.0, [(88.905849, 1.0)]),
    element!("Zr", "Zirconium",     91.224,     0.002,     4.0, [(89.904703, 0.5145), (90.905644, 0.1122), (91.905039, 0.1715), (93.906314, 0.1738), (95.908275, 0.0280)]),
    element!("Nb", "Niobium",       92.90638,   0.00002,   5.0, [(92.906377, 1.0)]),
    element!("Mo", "Molybdenum",    95.94,      0.02,      6.0, [(91.906808, 0.1484), (93.905085, 0.0925), (94.905840, 0.1592), (95.904678, 0.1668), (96.906020, 0.0955), (97.905406, 0.2413), (99.907477, 0.0963)]),
    element!("Tc", "Technetium",    98.0,       0.001,     7.0, [(97.907215, 1.0)]),
    element!("Ru", "Ruthenium",     101.07,     0.02,      3.0, [(95.907599, 0.0554), (97.905287, 0.0187), (98.905939, 0.1276), (99.904219, 0.1260), (100.905582, 0.1706), (101.904348, 0.3155), (103.905424, 0.1862)]),
    element!("Rh", "Rhodium",       102.90550,  0.00002,   3.0, [(102.905500, 1.0)]),
    element!("Pd", "Palladium",     106.42,     0.01,      2.0, [(101.905634, 0.0102), (103.904029, 0.1114), (104.905079, 0.2233), (105.903478, 0.2733), (107.903895, 0.2646), (109.905167, 0.1172)]),
    element!("Ag", "Silver",        107.8682,   0.0002,    1.0, [(106.905092, 0.51839), (108.904757, 0.48161)]),
    element!("Cd", "Cadmium",       112.411,    0.008,     2.0, [(105.906461, 0.0125), (107.904176, 0.0089), (109.903005, 0.1249), (110.904182, 0.1280), (111.902758, 0.2413), (112.904400, 0.1222), (113.903357, 0.2873), (115.904754, 0.0749)]),
    element!("In", "Indium",        114.818,    0.003,     3.0, [(112.904061, 0.0429), (114.903880, 0.9571)]),
    element!("Sn", "Tin",           118.710,    0.007,     4.0, [(111.904826, 0.0097), (113.902784, 0.0066), (114.903348, 0.0034), (115.901747, 0.1454), (116.902956, 0.0768), (117.901609, 0.2422), (118.903310, 0.0859), (119.902200, 0.3258), (121.903440, 0.0463), (123.905274, 0.0579)]),
    element!("Sb", "Antimony",      121.760,    0.001,     3.0, [(120.903821, 0.5721), (122.904216, 0.4279)]),
    element!("Te", "Tellurium",     127.60,     0.03,     -2.0, [(119.904048, 0.0009), (121.903054, 0.0255), (122.904271, 0.0089), (123.902823, 0.0474), (124.904433, 0.0707), (125.903314, 0.1884), (127.904463, 0.3174), (129.906229, 0.3408)]),
    element!("I",  "Iodine",        126.90447,  0.00003,  -1.0, [(126.904473, 1.0)]),
    element!("Xe", "Xenon",         131.293,    0.006,     0.0, [(123.905894, 0.0009), (125.904281, 0.0009), (127.903531, 0.0192), (128.904780, 0.2644), (129.903509, 0.0408), (130.905072, 0.2118), (131.904144, 0.2689), (133.905395, 0.1044), (135.907214, 0.0887)]),
    element!("Cs", "Caesium",       132.90545,  0.00002,   1.0, [(132.905429, 1.0)]),
    element!("Ba", "Barium",        137.327,    0.007,     2.0, [(129.906282, 0.00106), (131.905042, 0.00101), (133.904486, 0.02417), (134.905665, 0.06592), (135.904553, 0.07854), (136.905812, 0.11232), (137.905232, 0.71698)]),
    element!("La", "Lanthanum",     138.9055,   0.0002,    3.0, [(137.907110, 0.00090), (138.906347, 0.99910)]),
    element!("Ce", "Cerium",        140.116,    0.001,     3.0, [(135.907140, 0.00185), (137.905985, 0.00251), (139.905433, 0.88450), (141.909241, 0.11114)]),
    element!("Pr", "Praseodymium",  140.90765,  0.00002,   3.0, [(140.907647, 1.0)]),
    element!("Nd", "Neodymium",     144.24,     0.03,      3.0, [(141.907719, 0.272), (142.909810, 0.122), (143.910083, 0.238), (144.912570, 0.083), (145.913113, 0.172), (147.916889, 0.057), (149.920887, 0.056)]),
    element!("Pm", "Promethium",    145.0,      0.001,     3.0, [(144.912743, 1.0)]),
    element!("Sm", "Samarium",      150.36,     0.03,      3.0, [(143.911998, 0.0307), (146.914895, 0.1499), (147.914820, 0.1124), (148.917181, 0.1382), (149.917273, 0.0738), (151.919729, 0.2675), (153.922206, 0.2275)]),
    element!("Eu", "Europium",      151.964,    0.001,     3.0, [(150.919847, 0.4781), (152.921225, 0.5219)]),
    element!("Gd", "Gadolinium",    157.25,     0.03,      3.0, [(151.919786, 0.0020), (153.920861, 0.0218), (154.922618, 0.1480), (155.922118, 0.2047), (156.923956, 0.1565), (157.924099, 0.2484), (159.927049, 0.2186)]),
    element!("Tb", "Terbium",       158.92534,  0.00002,   3.0, [(158.925342, 1.0)]),
    element!("Dy", "Dysprosium",    162.500,    0.001,     3.0, [(155.925277, 0.0006), (157.924403, 0.0010), (159.925193, 0.0234), (160.926930, 0.1891), (161.926795, 0.2551), (162.928728, 0.2489), (163.929171, 0.2819)]),
    element!("Ho", "Holmium",       164.93032,  0.00002,   3.0, [(164.930319, 1.0)]),
    element!("Er", "Erbium",        167.259,    0.003,     3.0, [(161.928775, 0.0014), (163.929198, 0.0161), (165.930290, 0.3361), (166.932046, 0.2293), (167.932368, 0.2678), (169.935461, 0.1493)]),
    element!("Tm", "Thulium",       168.93421,  0.00002,   3.0, [(168.934212, 1.0)]),
    element!("Yb", "Ytterbium",     173.04,     0.03,      3.0, [(167.933894, 0.0013), (169.934759, 0.0304), (170.936323, 0.1428), (171.936378, 0.2183), (172.938208, 0.1613), (173.938859, 0.3183), (175.942564, 0.1276)]),
    element!("Lu", "Lutetium",      174.967,    0.001,     3.0, [(174.940770, 0.9741), (175.942679, 0.0259)]),
    element!("Hf", "Hafnium",       178.49,     0.02,      4.0, [(173.940044, 0.0016), (175.941406, 0.0526), (176.943217, 0.1860), (177.943696, 0.2728), (178.945812, 0.1362), (179.946545, 0.3508)]),
    element!("Ta", "Tantalum",      180.9479,   0.0001,    5.0, [(179.947462, 0.00012), (180.947992, 0.99988)]),
    element!("W",  "Tungsten",      183.84,     0.01,      6.0, [(179.946701, 0.0012), (181.948202, 0.2650), (182.950220, 0.1431), (183.950928, 0.3064), (185.954357, 0.2843)]),
    element!("Re", "Rhenium",       186.207,    0.001,     7.0, [(184.952951, 0.3740), (186.955744, 0.6260)]),
    element!("Os", "Osmium",        190.23,     0.03,      4.0, [(183.952488, 0.0002), (185.953830, 0.0159), (186.955741, 0.0196), (187.955860, 0.1324), (188.958137, 0.1615), (189.958436, 0.2626), (191.961467, 0.4078)]),
    element!("Ir", "Iridium",       192.217,    0.003,     4.0, [(190.960584, 0.373), (192.962917, 0.627)]),
    element!("Pt", "Platinum",      195.078,    0.002,     4.0, [(189.959917, 0.00014), (191.961019, 0.00782), (193.962655, 0.32967), (194.964766, 0.33832), (195.964926, 0.25242), (197.967869, 0.07163)]),
    element!("Au", "Gold",          196.96655,  0.00002,   3.0, [(196.966543, 1.0)]),
    element!("Hg", "Mercury",       200.59,     0.02,      2.0, [(195.965807, 0.0015), (197.966743, 0.0997), (198.968254, 0.1687), (199.968300, 0.2310), (200.970277, 0.1318), (201.970617, 0.2986), (203.973467, 0.0687)]),
    element!("Tl", "Thallium",      204.3833,   0.0002,    1.0, [(202.972320, 0.29524), (204.974401, 0.70476)]),
    element!("Pb", "Lead",          207.2,      0.1,       2.0, [(203.973020, 0.014), (205.974440, 0.241), (206.975872, 0.221), (207.976627, 0.524)]),
    element!("Bi", "Bismuth",       208.98038,  0.00002,   3.0, [(208.980374, 1.0)]),
    element!("Po", "Polonium",      209.0,      0.001,     2.0, [(208.982404, 1.0)]),
    element!("At", "Astatine",      210.0,      0.001,    -1.0, [(209.987126, 1.0)]),
    element!("Rn", "Radon",         222.0,      0.001,     0.0, [(222.017571, 1.0)]),
    element!("Fr", "Francium",      223.0,      0.001,     1.0, [(223.019733, 1.0)]),
    element!("Ra", "Radium",        226.0,      0.001,     2.0, [(226.025403, 1.0)]),
    element!("Ac", "Actinium",      227.0,      0.001,     3.0, [(227.027750, 1.0)]),
    element!("Th", "Thorium",       232.0381,   0.0001,    4.0, [(232.038054, 1.0)]),
    element!("Pa", "Protactinium",  231.03588,  0.00002,   5.0, [(231.035880, 1.0)]),
    element!("U",  "Uranium",       238.02891,  0.00003,   6.0, [(234.040947, 0.000055), (235.043924, 0.007200), (238.050785, 0.992745)]),
    element!("Np", "Neptunium",     237.0,      0.001,     5.0, [(237.048168, 1.0)]),
    element!("Pu", "Plutonium",     244.0,      0.001,     4.0, [(244.064199, 1.0)]),
    element!("Am", "Americium",     243.0,      0.001,     3.0, [(243.061375, 1.0)]),
    element!("Cm", "Curium",        247.0,      0.001,     3.0, [(247.070347, 1.0)]),
    element!("Bk", "Berkelium",     247.0,      0.001,     3.0, [(247.070300, 1.0)]),
    element!("Cf", "Californium",   251.0,      0.001,     3.0, [(251.079580, 1.0)]),
    element!("Es", "Einsteinium",   252.0,      0.001,     3.0, [(252.082944, 1.0)]),
    element!("Fm", "Fermium",       257.0,      0.001,     3.0, [(257.095099, 1.0)]),
    element!("Md", "Mendelevium",   258.0,      0.001,     3.0, [(258.098570, 1.0)]),
    element!("No", "Nobelium",      259.0,      0.001,     2.0, [(259.100931, 1.0)]),
    element!("Lr", "Lawrencium",    262.0,      0.001,     3.0, [(262.109692, 1.0)]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abundances_sum_to_one() {
        for record in &ELEMENTS {
            let total: f64 = record.isotopes.iter().map(|&(_, a)| a).sum();
            assert!(
                (total - 1.0).abs() < 1e-4,
                "{}: isotope abundances sum to {total}",
                record.symbol
            );
        }
    }

    #[test]
    fn isotopes_sorted_by_mass() {
        for record in &ELEMENTS {
            for pair in record.isotopes.windows(2) {
                assert!(
                    pair[0].0 < pair[1].0,
                    "{}: isotope masses out of order",
                    record.symbol
                );
            }
        }
    }

    #[test]
    fn symbols_unique() {
        for (i, a) in ELEMENTS.iter().enumerate() {
            for b in &ELEMENTS[i + 1..] {
                assert_ne!(a.symbol, b.symbol);
            }
        }
    }
}
