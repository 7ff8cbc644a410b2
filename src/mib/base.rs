//! Compiled base module set.
//!
//! The subset of SNMPv2-SMI, SNMPv2-MIB, IF-MIB, IP-MIB and
//! HOST-RESOURCES-MIB that a client needs for everyday name resolution and
//! display. Stands in for a MIB file loader.

pub(super) struct BaseNode {
    pub module: &'static str,
    pub name: &'static str,
    pub oid: &'static [u32],
    pub hint: Option<&'static str>,
    pub convention: Option<&'static str>,
    pub enums: &'static [(i64, &'static str)],
}

macro_rules! node {
    ($module:literal, $name:literal, [$($arc:literal),*]) => {
        BaseNode {
            module: $module,
            name: $name,
            oid: &[$($arc),*],
            hint: None,
            convention: None,
            enums: &[],
        }
    };
}

const STATUS_ENUMS: &[(i64, &str)] = &[(1, "up"), (2, "down"), (3, "testing")];

const OPER_STATUS_ENUMS: &[(i64, &str)] = &[
    (1, "up"),
    (2, "down"),
    (3, "testing"),
    (4, "unknown"),
    (5, "dormant"),
    (6, "notPresent"),
    (7, "lowerLayerDown"),
];

const IF_TYPE_ENUMS: &[(i64, &str)] = &[
    (1, "other"),
    (6, "ethernetCsmacd"),
    (23, "ppp"),
    (24, "softwareLoopback"),
    (53, "propVirtual"),
    (71, "ieee80211"),
    (131, "tunnel"),
    (135, "l2vlan"),
];

pub(super) static BASE_NODES: &[BaseNode] = &[
    // SNMPv2-SMI root path
    node!("SNMPv2-SMI", "iso", [1]),
    node!("SNMPv2-SMI", "org", [1, 3]),
    node!("SNMPv2-SMI", "dod", [1, 3, 6]),
    node!("SNMPv2-SMI", "internet", [1, 3, 6, 1]),
    node!("SNMPv2-SMI", "directory", [1, 3, 6, 1, 1]),
    node!("SNMPv2-SMI", "mgmt", [1, 3, 6, 1, 2]),
    node!("SNMPv2-SMI", "mib-2", [1, 3, 6, 1, 2, 1]),
    node!("SNMPv2-SMI", "transmission", [1, 3, 6, 1, 2, 1, 10]),
    node!("SNMPv2-SMI", "experimental", [1, 3, 6, 1, 3]),
    node!("SNMPv2-SMI", "private", [1, 3, 6, 1, 4]),
    node!("SNMPv2-SMI", "enterprises", [1, 3, 6, 1, 4, 1]),
    node!("SNMPv2-SMI", "security", [1, 3, 6, 1, 5]),
    node!("SNMPv2-SMI", "snmpV2", [1, 3, 6, 1, 6]),
    node!("SNMPv2-SMI", "snmpDomains", [1, 3, 6, 1, 6, 1]),
    node!("SNMPv2-SMI", "snmpProxys", [1, 3, 6, 1, 6, 2]),
    node!("SNMPv2-SMI", "snmpModules", [1, 3, 6, 1, 6, 3]),
    // SNMPv2-MIB system group
    node!("SNMPv2-MIB", "system", [1, 3, 6, 1, 2, 1, 1]),
    BaseNode {
        module: "SNMPv2-MIB",
        name: "sysDescr",
        oid: &[1, 3, 6, 1, 2, 1, 1, 1],
        hint: Some("255a"),
        convention: Some("DisplayString"),
        enums: &[],
    },
    node!("SNMPv2-MIB", "sysObjectID", [1, 3, 6, 1, 2, 1, 1, 2]),
    node!("SNMPv2-MIB", "sysUpTime", [1, 3, 6, 1, 2, 1, 1, 3]),
    BaseNode {
        module: "SNMPv2-MIB",
        name: "sysContact",
        oid: &[1, 3, 6, 1, 2, 1, 1, 4],
        hint: Some("255a"),
        convention: Some("DisplayString"),
        enums: &[],
    },
    BaseNode {
        module: "SNMPv2-MIB",
        name: "sysName",
        oid: &[1, 3, 6, 1, 2, 1, 1, 5],
        hint: Some("255a"),
        convention: Some("DisplayString"),
        enums: &[],
    },
    BaseNode {
        module: "SNMPv2-MIB",
        name: "sysLocation",
        oid: &[1, 3, 6, 1, 2, 1, 1, 6],
        hint: Some("255a"),
        convention: Some("DisplayString"),
        enums: &[],
    },
    node!("SNMPv2-MIB", "sysServices", [1, 3, 6, 1, 2, 1, 1, 7]),
    node!("SNMPv2-MIB", "sysORLastChange", [1, 3, 6, 1, 2, 1, 1, 8]),
    node!("SNMPv2-MIB", "sysORTable", [1, 3, 6, 1, 2, 1, 1, 9]),
    node!("SNMPv2-MIB", "sysOREntry", [1, 3, 6, 1, 2, 1, 1, 9, 1]),
    node!("SNMPv2-MIB", "sysORIndex", [1, 3, 6, 1, 2, 1, 1, 9, 1, 1]),
    node!("SNMPv2-MIB", "sysORID", [1, 3, 6, 1, 2, 1, 1, 9, 1, 2]),
    BaseNode {
        module: "SNMPv2-MIB",
        name: "sysORDescr",
        oid: &[1, 3, 6, 1, 2, 1, 1, 9, 1, 3],
        hint: Some("255a"),
        convention: Some("DisplayString"),
        enums: &[],
    },
    node!("SNMPv2-MIB", "sysORUpTime", [1, 3, 6, 1, 2, 1, 1, 9, 1, 4]),
    // SNMPv2-MIB snmp group (subset)
    node!("SNMPv2-MIB", "snmp", [1, 3, 6, 1, 2, 1, 11]),
    node!("SNMPv2-MIB", "snmpInPkts", [1, 3, 6, 1, 2, 1, 11, 1]),
    node!("SNMPv2-MIB", "snmpOutPkts", [1, 3, 6, 1, 2, 1, 11, 2]),
    node!("SNMPv2-MIB", "snmpInBadVersions", [1, 3, 6, 1, 2, 1, 11, 3]),
    node!(
        "SNMPv2-MIB",
        "snmpInBadCommunityNames",
        [1, 3, 6, 1, 2, 1, 11, 4]
    ),
    node!("SNMPv2-MIB", "snmpInASNParseErrs", [1, 3, 6, 1, 2, 1, 11, 6]),
    BaseNode {
        module: "SNMPv2-MIB",
        name: "snmpEnableAuthenTraps",
        oid: &[1, 3, 6, 1, 2, 1, 11, 30],
        hint: None,
        convention: None,
        enums: &[(1, "enabled"), (2, "disabled")],
    },
    // SNMPv2-MIB trap objects
    node!("SNMPv2-MIB", "snmpMIB", [1, 3, 6, 1, 6, 3, 1]),
    node!("SNMPv2-MIB", "snmpMIBObjects", [1, 3, 6, 1, 6, 3, 1, 1]),
    node!("SNMPv2-MIB", "snmpTrap", [1, 3, 6, 1, 6, 3, 1, 1, 4]),
    node!("SNMPv2-MIB", "snmpTrapOID", [1, 3, 6, 1, 6, 3, 1, 1, 4, 1]),
    node!(
        "SNMPv2-MIB",
        "snmpTrapEnterprise",
        [1, 3, 6, 1, 6, 3, 1, 1, 4, 3]
    ),
    node!("SNMPv2-MIB", "snmpTraps", [1, 3, 6, 1, 6, 3, 1, 1, 5]),
    node!("SNMPv2-MIB", "coldStart", [1, 3, 6, 1, 6, 3, 1, 1, 5, 1]),
    node!("SNMPv2-MIB", "warmStart", [1, 3, 6, 1, 6, 3, 1, 1, 5, 2]),
    node!("SNMPv2-MIB", "linkDown", [1, 3, 6, 1, 6, 3, 1, 1, 5, 3]),
    node!("SNMPv2-MIB", "linkUp", [1, 3, 6, 1, 6, 3, 1, 1, 5, 4]),
    node!(
        "SNMPv2-MIB",
        "authenticationFailure",
        [1, 3, 6, 1, 6, 3, 1, 1, 5, 5]
    ),
    node!(
        "SNMPv2-MIB",
        "egpNeighborLoss",
        [1, 3, 6, 1, 6, 3, 1, 1, 5, 6]
    ),
    // IF-MIB interfaces group
    node!("IF-MIB", "interfaces", [1, 3, 6, 1, 2, 1, 2]),
    node!("IF-MIB", "ifNumber", [1, 3, 6, 1, 2, 1, 2, 1]),
    node!("IF-MIB", "ifTable", [1, 3, 6, 1, 2, 1, 2, 2]),
    node!("IF-MIB", "ifEntry", [1, 3, 6, 1, 2, 1, 2, 2, 1]),
    node!("IF-MIB", "ifIndex", [1, 3, 6, 1, 2, 1, 2, 2, 1, 1]),
    BaseNode {
        module: "IF-MIB",
        name: "ifDescr",
        oid: &[1, 3, 6, 1, 2, 1, 2, 2, 1, 2],
        hint: Some("255a"),
        convention: Some("DisplayString"),
        enums: &[],
    },
    BaseNode {
        module: "IF-MIB",
        name: "ifType",
        oid: &[1, 3, 6, 1, 2, 1, 2, 2, 1, 3],
        hint: None,
        convention: Some("IANAifType"),
        enums: IF_TYPE_ENUMS,
    },
    node!("IF-MIB", "ifMtu", [1, 3, 6, 1, 2, 1, 2, 2, 1, 4]),
    node!("IF-MIB", "ifSpeed", [1, 3, 6, 1, 2, 1, 2, 2, 1, 5]),
    BaseNode {
        module: "IF-MIB",
        name: "ifPhysAddress",
        oid: &[1, 3, 6, 1, 2, 1, 2, 2, 1, 6],
        hint: Some("1x:"),
        convention: Some("PhysAddress"),
        enums: &[],
    },
    BaseNode {
        module: "IF-MIB",
        name: "ifAdminStatus",
        oid: &[1, 3, 6, 1, 2, 1, 2, 2, 1, 7],
        hint: None,
        convention: None,
        enums: STATUS_ENUMS,
    },
    BaseNode {
        module: "IF-MIB",
        name: "ifOperStatus",
        oid: &[1, 3, 6, 1, 2, 1, 2, 2, 1, 8],
        hint: None,
        convention: None,
        enums: OPER_STATUS_ENUMS,
    },
    node!("IF-MIB", "ifLastChange", [1, 3, 6, 1, 2, 1, 2, 2, 1, 9]),
    node!("IF-MIB", "ifInOctets", [1, 3, 6, 1, 2, 1, 2, 2, 1, 10]),
    node!("IF-MIB", "ifInUcastPkts", [1, 3, 6, 1, 2, 1, 2, 2, 1, 11]),
    node!("IF-MIB", "ifInNUcastPkts", [1, 3, 6, 1, 2, 1, 2, 2, 1, 12]),
    node!("IF-MIB", "ifInDiscards", [1, 3, 6, 1, 2, 1, 2, 2, 1, 13]),
    node!("IF-MIB", "ifInErrors", [1, 3, 6, 1, 2, 1, 2, 2, 1, 14]),
    node!(
        "IF-MIB",
        "ifInUnknownProtos",
        [1, 3, 6, 1, 2, 1, 2, 2, 1, 15]
    ),
    node!("IF-MIB", "ifOutOctets", [1, 3, 6, 1, 2, 1, 2, 2, 1, 16]),
    node!("IF-MIB", "ifOutUcastPkts", [1, 3, 6, 1, 2, 1, 2, 2, 1, 17]),
    node!("IF-MIB", "ifOutNUcastPkts", [1, 3, 6, 1, 2, 1, 2, 2, 1, 18]),
    node!("IF-MIB", "ifOutDiscards", [1, 3, 6, 1, 2, 1, 2, 2, 1, 19]),
    node!("IF-MIB", "ifOutErrors", [1, 3, 6, 1, 2, 1, 2, 2, 1, 20]),
    node!("IF-MIB", "ifOutQLen", [1, 3, 6, 1, 2, 1, 2, 2, 1, 21]),
    node!("IF-MIB", "ifSpecific", [1, 3, 6, 1, 2, 1, 2, 2, 1, 22]),
    node!("IF-MIB", "ifMIB", [1, 3, 6, 1, 2, 1, 31]),
    node!("IF-MIB", "ifMIBObjects", [1, 3, 6, 1, 2, 1, 31, 1]),
    node!("IF-MIB", "ifXTable", [1, 3, 6, 1, 2, 1, 31, 1, 1]),
    node!("IF-MIB", "ifXEntry", [1, 3, 6, 1, 2, 1, 31, 1, 1, 1]),
    BaseNode {
        module: "IF-MIB",
        name: "ifName",
        oid: &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 1],
        hint: Some("255a"),
        convention: Some("DisplayString"),
        enums: &[],
    },
    node!("IF-MIB", "ifHCInOctets", [1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 6]),
    node!(
        "IF-MIB",
        "ifHCOutOctets",
        [1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 10]
    ),
    node!("IF-MIB", "ifHighSpeed", [1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 15]),
    BaseNode {
        module: "IF-MIB",
        name: "ifAlias",
        oid: &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 18],
        hint: Some("64a"),
        convention: Some("DisplayString"),
        enums: &[],
    },
    // IP-MIB / legacy mib-2 groups
    node!("IP-MIB", "ip", [1, 3, 6, 1, 2, 1, 4]),
    BaseNode {
        module: "IP-MIB",
        name: "ipForwarding",
        oid: &[1, 3, 6, 1, 2, 1, 4, 1],
        hint: None,
        convention: None,
        enums: &[(1, "forwarding"), (2, "notForwarding")],
    },
    node!("IP-MIB", "ipDefaultTTL", [1, 3, 6, 1, 2, 1, 4, 2]),
    node!("IP-MIB", "icmp", [1, 3, 6, 1, 2, 1, 5]),
    node!("TCP-MIB", "tcp", [1, 3, 6, 1, 2, 1, 6]),
    node!("TCP-MIB", "tcpConnTable", [1, 3, 6, 1, 2, 1, 6, 13]),
    node!("UDP-MIB", "udp", [1, 3, 6, 1, 2, 1, 7]),
    node!("RFC1213-MIB", "egp", [1, 3, 6, 1, 2, 1, 8]),
    // HOST-RESOURCES-MIB (subset)
    node!("HOST-RESOURCES-MIB", "host", [1, 3, 6, 1, 2, 1, 25]),
    node!("HOST-RESOURCES-MIB", "hrSystem", [1, 3, 6, 1, 2, 1, 25, 1]),
    node!(
        "HOST-RESOURCES-MIB",
        "hrSystemUptime",
        [1, 3, 6, 1, 2, 1, 25, 1, 1]
    ),
    BaseNode {
        module: "HOST-RESOURCES-MIB",
        name: "hrSystemDate",
        oid: &[1, 3, 6, 1, 2, 1, 25, 1, 2],
        hint: Some("2d-1d-1d,1d:1d:1d.1d,1a1d:1d"),
        convention: Some("DateAndTime"),
        enums: &[],
    },
    node!(
        "HOST-RESOURCES-MIB",
        "hrMemorySize",
        [1, 3, 6, 1, 2, 1, 25, 2, 2]
    ),
];
