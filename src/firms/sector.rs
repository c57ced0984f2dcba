//! SIC 2007 division extraction and descriptions

/// Industry sector at SIC division level (two leading digits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sector {
    Division(u8),
    /// Code with no usable numeric prefix
    Unclassified,
}

impl Sector {
    /// Derive the division from the two leading digits of a raw
    /// classification code.
    ///
    /// A four-digit code whose two-digit prefix is not a SIC division is
    /// read as a subclass that lost the leading zero of divisions 01-09
    /// ("3411" is division 3).
    pub fn from_sic_code(code: &str) -> Self {
        let digits: String = code.trim().chars().take_while(|c| c.is_ascii_digit()).collect();

        let division = match digits.len() {
            0 => return Sector::Unclassified,
            1 | 2 => digits.parse::<u8>().ok(),
            len => {
                let prefix = digits[..2].parse::<u8>().ok();
                match prefix {
                    Some(d) if len == 4 && !is_known_division(d) => digits[..1].parse::<u8>().ok(),
                    _ => prefix,
                }
            }
        };

        match division {
            Some(d) if d > 0 => Sector::Division(d),
            _ => Sector::Unclassified,
        }
    }

    pub fn division(&self) -> Option<u8> {
        match self {
            Sector::Division(d) => Some(*d),
            Sector::Unclassified => None,
        }
    }

    /// Human-readable sector name, falling back to "SIC {n}"
    pub fn description(&self) -> String {
        match self {
            Sector::Division(d) => division_name(*d)
                .map(str::to_string)
                .unwrap_or_else(|| format!("SIC {}", d)),
            Sector::Unclassified => "Unclassified".to_string(),
        }
    }
}

/// Whether a division number exists in SIC 2007
pub fn is_known_division(division: u8) -> bool {
    division_name(division).is_some()
}

fn division_name(division: u8) -> Option<&'static str> {
    let name = match division {
        1 => "Crop and animal production",
        2 => "Forestry and logging",
        3 => "Fishing and aquaculture",
        5 => "Mining of coal and lignite",
        6 => "Extraction of crude petroleum and natural gas",
        7 => "Mining of metal ores",
        8 => "Other mining and quarrying",
        9 => "Mining support service activities",
        10 => "Manufacture of food products",
        11 => "Manufacture of beverages",
        12 => "Manufacture of tobacco products",
        13 => "Manufacture of textiles",
        14 => "Manufacture of wearing apparel",
        15 => "Manufacture of leather and related products",
        16 => "Manufacture of wood and cork products",
        17 => "Manufacture of paper and paper products",
        18 => "Printing and reproduction of recorded media",
        19 => "Manufacture of coke and refined petroleum products",
        20 => "Manufacture of chemicals and chemical products",
        21 => "Manufacture of pharmaceutical products",
        22 => "Manufacture of rubber and plastic products",
        23 => "Manufacture of other non-metallic mineral products",
        24 => "Manufacture of basic metals",
        25 => "Manufacture of fabricated metal products",
        26 => "Manufacture of computer and electronic products",
        27 => "Manufacture of electrical equipment",
        28 => "Manufacture of machinery and equipment",
        29 => "Manufacture of motor vehicles",
        30 => "Manufacture of other transport equipment",
        31 => "Manufacture of furniture",
        32 => "Other manufacturing",
        33 => "Repair and installation of machinery",
        35 => "Electricity, gas, steam and air supply",
        36 => "Water collection, treatment and supply",
        37 => "Sewerage",
        38 => "Waste collection and disposal",
        39 => "Remediation activities",
        41 => "Construction of buildings",
        42 => "Civil engineering",
        43 => "Specialised construction activities",
        45 => "Wholesale and retail trade of motor vehicles",
        46 => "Wholesale trade",
        47 => "Retail trade",
        49 => "Land transport",
        50 => "Water transport",
        51 => "Air transport",
        52 => "Warehousing and transport support",
        53 => "Postal and courier activities",
        55 => "Accommodation",
        56 => "Food and beverage service activities",
        58 => "Publishing activities",
        59 => "Motion picture and TV production",
        60 => "Programming and broadcasting",
        61 => "Telecommunications",
        62 => "Computer programming and consultancy",
        63 => "Information service activities",
        64 => "Financial service activities",
        65 => "Insurance and pension funding",
        66 => "Auxiliary financial services",
        68 => "Real estate activities",
        69 => "Legal and accounting activities",
        70 => "Head offices and management consultancy",
        71 => "Architectural and engineering activities",
        72 => "Scientific research and development",
        73 => "Advertising and market research",
        74 => "Other professional activities",
        75 => "Veterinary activities",
        77 => "Rental and leasing activities",
        78 => "Employment activities",
        79 => "Travel agency and tour operator activities",
        80 => "Security and investigation activities",
        81 => "Services to buildings and landscape",
        82 => "Office administrative and support activities",
        84 => "Public administration and defence",
        85 => "Education",
        86 => "Human health activities",
        87 => "Residential care activities",
        88 => "Social work activities",
        90 => "Creative, arts and entertainment",
        91 => "Libraries, archives and museums",
        92 => "Gambling and betting activities",
        93 => "Sports and recreation activities",
        94 => "Activities of membership organisations",
        95 => "Repair of computers and household goods",
        96 => "Other personal service activities",
        97 => "Households as employers of domestic personnel",
        98 => "Undifferentiated household production",
        99 => "Extraterritorial organisations",
        _ => return None,
    };
    Some(name)
}
