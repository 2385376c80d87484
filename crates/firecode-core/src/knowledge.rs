//! Static knowledge base: the Fire Code reference digest injected into every
//! prompt as the model's only source of truth, plus the NTC defect checklist
//! the inspector picks violations from.
//!
//! This text is configuration, not behavior. In a larger deployment it would
//! live in a retrieval layer; here the core rules are embedded directly so the
//! assistant works offline-first and the grounding is auditable.

/// Fire safety guidelines digest (RIRR of RA 9514, Volume 2). Injected verbatim
/// as grounding context for report generation, chat, and NTC mapping.
pub const FIRE_CODE_CONTEXT: &str = r#"
FIRE SAFETY GUIDELINES ON DIFFERENT TYPE OF OCCUPANCY VOLUME 2 (Based on RIRR of RA 9514)

1. PLACES OF ASSEMBLY
- Means of Egress:
  - At least 2 exits remote from each other.
  - 3 exits for 500-1000 persons.
  - 4 exits for >1000 persons. (Section 10.2.5.2 para G)
  - Travel Distance: <46m (unsprinklered), <61m (sprinklered) (Section 10.2.8.2 para E)
  - Occupant Load: Concentrated use w/o fixed seats: 0.65 sqm/person. Less concentrated: 1.4 sqm/person. Standing: 0.28 sqm/person. (Section 10.2.8.1)
  - Aisles: >60 seats needs 915mm (one side) or 122cm (both sides). <60 seats needs 76cm.
- Protection:
  - Fire Detection/Alarm: Manual for all. Automatic if >300 persons. (Section 10.2.8.8 para D)
  - Sprinklers: Required for bars/dance halls/discotheques >150 persons, or any assembly >300 persons. (Section 10.2.8.8 para E)
  - Emergency Lighting: Required. (Section 10.2.8.2 para I)

2. EDUCATIONAL OCCUPANCY
- Means of Egress:
  - At least 2 separate exits per storey.
  - Room capacity >50 or >93sqm must have 2 remote doorways. (Section 10.2.9.2 para B)
  - Travel Distance: <46m (unsprinklered), <61m (sprinklered). (Section 10.2.9.2 para C)
  - Occupant Load: Classroom: 1.9 sqm/person. Shops/Labs: 4.6 sqm/person. Dry nursery: 3.3 sqm/person. (Section 10.2.9.1 para B)
- Protection:
  - Fire Alarm: Manual required. Automatic if sprinklered. (Section 10.2.9.5 para D)
  - Sprinklers: Required for basements used as classrooms/labs. High rise educational buildings must be fully sprinklered. (Section 10.2.9.5 para E)
  - Extinguishers: 1 unit per 200sqm (Low hazard), 100sqm (Moderate), 75sqm (High). (Section 10.2.6.9 para G)

3. DAY CARE OCCUPANCY
- General: >12 clients, <24 hrs/day.
- Occupant Load: 3.3 sqm/person. (Section 10.2.10.2)
- Egress: Dead-end corridors <6m (unsprinklered) or <10m (sprinklered). Travel distance <46m (<61m if sprinklered).
- Windows for Rescue: Required for rooms normally subject to client occupancy. Width >560mm, Height >800mm.
- Protection: Smoke detection system required in lounges, recreation areas, sleeping rooms. (Section 10.2.10.6 para B)

4. HEALTH CARE OCCUPANCY
- Egress:
  - At least 2 remote exits.
  - Door width >112cm for hospitals/nursing homes.
  - Aisles/Corridors/Ramps: >244cm (Hospitals/Nursing Homes). (Section 10.2.11.2 para C.4)
  - Travel Distance: Room door to exit <30m. Any point to exit <46m.
- Protection:
  - Sprinklers: Required throughout hospitals/nursing homes. Quick-response in sleeping rooms. (Section 10.2.11.3 para F)
  - Fire Alarm: Manually operated. (Section 10.2.11.3 para F.1)

5. RESIDENTIAL BOARD AND CARE
- Small Facilities (<16 residents):
  - Primary escape: interior stair, exterior stair, horizontal exit.
  - Windows for rescue required if no secondary means of escape.
  - Automatic sprinkler required if >4 storeys.
- Large Facilities (>16 residents):
  - Occupant Load: 1 person/18.6 sqm.
  - Sprinklers required for all buildings (Exception: 1 storey with <5 beds).
  - Smoke alarms required in sleeping rooms, outside sleeping areas, and on all levels.

6. RESIDENTIAL OCCUPANCY (Hotels/Dormitories)
- Egress:
  - Occupant Load: 18.6 sqm/person.
  - Minimum Corridor Width: 1.12m.
  - Travel Distance: Guest room to corridor door <23m (unsprinklered), <38m (sprinklered).
- Protection:
  - Sprinklers: Required for >4 storeys (NFPA 13R for <=4 storeys, NFPA 13 for >=5 storeys).
  - Fire Alarm: Manual if <15 guests. Automatic if >=15 guests. (Section 10.2.14.3 para C.4)

7. APARTMENT BUILDINGS
- Egress:
  - Every living unit needs access to at least 2 separate exits.
  - Travel Distance: Within unit to exit <15.5m.
- Protection:
  - Sprinklers: Required for >4 storeys.
  - Fire Alarm: Manual for <=3 storeys. Automatic for >=4 storeys or >12 units.

8. MERCANTILE OCCUPANCY
- Class A (>2788 sqm or >3 floors), Class B (279-2787 sqm), Class C (<278 sq m).
- Occupant Load: Street floor/Sales floor 2.8 sqm/person. Upper floors 5.6 sqm/person. (Section 10.2.15.1)
- Protection:
  - Sprinklers: Required for Class A, or >3 storeys with >232sqm floor area. (Section 10.2.15.3 para D)
  - Alarm: Automatic for Class A & B.

9. BUSINESS OCCUPANCY
- Occupant Load: 9.3 sqm/person (General). 4.6 sqm/person (Call Centers/BPO/IT). (Section 10.2.16.1 para C.1)
- Egress: Travel distance <46m (unsprinklered), <61m (sprinklered).
- Protection:
  - Sprinklers: Required if building is 15m or more in height.
  - Fire Alarm: Required if >2 storeys, or >50 occupants above/below exit discharge, or >300 total occupants.

10. INDUSTRIAL OCCUPANCY
- Occupant Load: 9.3 sqm/person.
- Egress: At least 2 exits. Travel distance <61m (unsprinklered), <76m (sprinklered).
- Protection:
  - Automatic detection required for >25 employees.
  - High hazard requires AFSS (Automatic Fire Suppression System).

11. STORAGE OCCUPANCY
- Egress: At least 2 exits. Travel distance <30m (with AFSS), <23m (without AFSS).
- Protection:
  - Sprinklers: Required for high hazard.
  - Alarm: Automatic for all storage except low hazard <2000sqm.

GENERAL INSPECTION NOTES:
- Use of "NO SMOKING" signs in hazardous areas.
- Maintenance of Means of Egress (free from obstruction).
- Regular testing of emergency lights and fire alarms.
- Fire extinguishers must be mounted, visible, and tagged.
- Electrical wirings must be compliant with PEC.
"#;

/// One NTC checklist group (e.g. "Means of Egress") and its selectable defects.
#[derive(Debug, Clone, Copy)]
pub struct DefectCategory {
    pub title: &'static str,
    pub items: &'static [&'static str],
}

/// Standard defect checklist shown by the NTC generator, grouped by inspection area.
pub const DEFECT_CATEGORIES: &[DefectCategory] = &[
    DefectCategory {
        title: "Means of Egress",
        items: &[
            "Obstruction in exit ways / corridors",
            "Locked exit doors during occupancy",
            "Exit door swings against flow of egress",
            "Insufficient exit width or capacity",
            "Dead-end corridor exceeds limit",
            "Defective or missing panic hardware",
            "Exit discharge not leading to public way",
        ],
    },
    DefectCategory {
        title: "Fire Protection Systems",
        items: &[
            "Fire extinguisher expired/depressurized",
            "Fire extinguisher missing/not installed",
            "Fire extinguisher obstructed",
            "Sprinkler system control valve closed",
            "Sprinkler heads obstructed or painted",
            "Fire hose cabinet obstructed/incomplete",
        ],
    },
    DefectCategory {
        title: "Detection, Alarm & Communication",
        items: &[
            "Fire alarm control panel in trouble mode",
            "Manual pull station obstructed/defective",
            "Smoke/Heat detectors missing or defective",
            "No integrated fire alarm system",
            "Alarm bell/horn not audible",
        ],
    },
    DefectCategory {
        title: "Illumination & Signs",
        items: &[
            "Emergency lights non-functional",
            "Missing or defective exit signs",
            "Exit signs not illuminated",
            "No directional exit signage",
            "Improper placement of exit signs",
        ],
    },
    DefectCategory {
        title: "Electrical & Utilities",
        items: &[
            "Octopus connections (Overloading)",
            "Exposed electrical wiring/splices",
            "Uncovered junction boxes",
            "Use of flat cord for permanent wiring",
            "Electrical panel obstructed",
        ],
    },
    DefectCategory {
        title: "General Safety",
        items: &[
            "Poor housekeeping",
            "Improper storage of flammable liquids",
            "LPG tanks not secured/improperly stored",
            "No 'No Smoking' signs in hazard areas",
            "Failure to conduct fire drill",
            "No fire safety program/organization",
        ],
    },
];
